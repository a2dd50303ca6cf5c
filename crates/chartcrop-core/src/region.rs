//! Caption/footnote pairing.

use crate::label::{Label, LabeledBox};
use crate::scan::PageLayout;

/// A chart region: a caption and the footnote that closes it.
///
/// The region spans vertically from the caption's top edge down to the
/// footnote's bottom edge, so both label texts end up inside the crop.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartRegion {
    pub caption: LabeledBox,
    pub footnote: LabeledBox,
}

impl ChartRegion {
    pub fn new(caption: LabeledBox, footnote: LabeledBox) -> Self {
        Self { caption, footnote }
    }

    /// Top edge (caption top, page space).
    pub fn top(&self) -> f64 {
        self.caption.bbox.y1
    }

    /// Bottom edge (footnote bottom, page space).
    pub fn bottom(&self) -> f64 {
        self.footnote.bbox.y0
    }

    /// Vertical extent of the region.
    pub fn span(&self) -> f64 {
        (self.top() - self.bottom()).abs()
    }

    /// Left edge of the caption, the sort key for level grouping.
    pub fn left(&self) -> f64 {
        self.caption.bbox.x0
    }

    pub fn label(&self) -> &Label {
        &self.caption.label
    }
}

/// Pair captions with footnotes by position and sort by caption left edge.
///
/// The Nth caption pairs with the Nth footnote in encounter order; trailing
/// entries without a partner are left out. The sort is stable, so regions
/// sharing a left edge keep their encounter order.
pub fn pair_regions(captions: &[LabeledBox], footnotes: &[LabeledBox]) -> Vec<ChartRegion> {
    let mut regions: Vec<ChartRegion> = captions
        .iter()
        .zip(footnotes)
        .map(|(caption, footnote)| ChartRegion::new(caption.clone(), footnote.clone()))
        .collect();
    regions.sort_by(|a, b| a.left().total_cmp(&b.left()));
    regions
}

impl PageLayout {
    /// Chart regions of this page, sorted by caption left edge.
    pub fn regions(&self) -> Vec<ChartRegion> {
        pair_regions(&self.captions, &self.footnotes)
    }
}
