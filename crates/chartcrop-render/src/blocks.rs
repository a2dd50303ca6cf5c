//! Grouping of single-line text runs into text blocks.
//!
//! PDF text layers hand out runs that never span more than one line. Labels
//! are classified per block, so a caption wrapped over two lines must arrive
//! as one element whose text keeps the line break and whose box covers both
//! lines.

use chartcrop_core::{BBox, LayoutElement};

/// Maximum vertical gap between two lines of one block, as a fraction of
/// the taller line's height.
pub const LINE_MARGIN: f64 = 0.5;

/// Maximum horizontal gap between two runs of one line, as a fraction of
/// the run height.
pub const RUN_MARGIN: f64 = 1.0;

#[derive(Debug, Clone)]
struct Line {
    bbox: BBox,
    text: String,
}

/// Merge text runs into lines, then lines into blocks.
///
/// Runs must be in content-stream order. Two runs join into one line when
/// their vertical midpoints lie within half a run height and the gap between
/// them is at most [`RUN_MARGIN`] run heights. A line joins the closest block
/// above it that overlaps it horizontally, if the gap is at most
/// [`LINE_MARGIN`] line heights. Blocks come back in the order their first
/// line appeared, with lines joined by `'\n'`. Non-text elements are ignored.
pub fn group_text_runs(runs: &[LayoutElement]) -> Vec<LayoutElement> {
    let lines = join_runs_into_lines(runs);
    let mut blocks: Vec<Line> = Vec::new();
    let mut block_last_line: Vec<BBox> = Vec::new();

    for line in lines {
        let mut best: Option<usize> = None;
        let mut best_gap = f64::INFINITY;

        for (i, last) in block_last_line.iter().enumerate() {
            let gap = last.y0 - line.bbox.y1;
            let limit = LINE_MARGIN * last.height().max(line.bbox.height());
            if gap >= 0.0 && gap <= limit && has_x_overlap(last, &line.bbox) && gap < best_gap {
                best_gap = gap;
                best = Some(i);
            }
        }

        match best {
            Some(i) => {
                blocks[i].bbox = blocks[i].bbox.union(&line.bbox);
                blocks[i].text.push('\n');
                blocks[i].text.push_str(&line.text);
                block_last_line[i] = line.bbox;
            }
            None => {
                block_last_line.push(line.bbox);
                blocks.push(line);
            }
        }
    }

    blocks
        .into_iter()
        .map(|block| LayoutElement::text(block.bbox, block.text))
        .collect()
}

fn join_runs_into_lines(runs: &[LayoutElement]) -> Vec<Line> {
    let mut lines: Vec<Line> = Vec::new();

    for run in runs {
        let Some(text) = run.text.as_deref() else {
            continue;
        };
        let bbox = run.bbox;

        let joined = lines.last_mut().filter(|line| {
            let height = bbox.height().max(line.bbox.height());
            let gap = bbox.x0 - line.bbox.x1;
            (mid_y(&bbox) - mid_y(&line.bbox)).abs() <= height / 2.0
                && gap >= -height / 2.0
                && gap <= RUN_MARGIN * height
        });

        match joined {
            Some(line) => {
                line.bbox = line.bbox.union(&bbox);
                line.text.push_str(text);
            }
            None => lines.push(Line {
                bbox,
                text: text.to_string(),
            }),
        }
    }

    lines
}

fn mid_y(b: &BBox) -> f64 {
    (b.y0 + b.y1) / 2.0
}

fn has_x_overlap(a: &BBox, b: &BBox) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1
}
