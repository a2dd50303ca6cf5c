//! Per-page caption/footnote scanning.
//!
//! [`scan_page`] walks a page's layout elements in document order, records
//! the horizontal extent of everything on the page, and collects caption and
//! footnote candidates. A footnote seen before any caption hands off to
//! [`resolve_orphan_footnote`](crate::continuation::resolve_orphan_footnote),
//! which may amend the previous page.

use std::path::PathBuf;

use tracing::debug;

use crate::continuation::resolve_orphan_footnote;
use crate::geometry::{BBox, PageSize};
use crate::label::{Classification, LabelPatterns, LabeledBox};

/// A layout element supplied by the document backend.
///
/// `text` is `None` for elements that carry no text (figures, rules, images);
/// they still count towards the page extents.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutElement {
    pub bbox: BBox,
    pub text: Option<String>,
}

impl LayoutElement {
    pub fn text(bbox: BBox, text: impl Into<String>) -> Self {
        Self {
            bbox,
            text: Some(text.into()),
        }
    }

    pub fn graphic(bbox: BBox) -> Self {
        Self { bbox, text: None }
    }
}

/// Everything the extractor keeps about one page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageLayout {
    /// 0-based page index.
    pub index: usize,
    /// Canvas size in page units.
    pub size: PageSize,
    /// Caption candidates in encounter order.
    pub captions: Vec<LabeledBox>,
    /// Footnote candidates in encounter order.
    pub footnotes: Vec<LabeledBox>,
    /// Minimum x over every layout element on the page.
    pub left_extent: f64,
    /// Maximum x over every layout element on the page.
    pub right_extent: f64,
    /// Rendered bitmap of the page, once the renderer has produced one.
    pub image_path: Option<PathBuf>,
}

impl PageLayout {
    /// Empty layout. Extents start inverted (`left = width`, `right = 0`)
    /// so the first element sets both.
    pub fn new(index: usize, size: PageSize) -> Self {
        Self {
            index,
            size,
            captions: Vec::new(),
            footnotes: Vec::new(),
            left_extent: size.width,
            right_extent: 0.0,
            image_path: None,
        }
    }

    /// True when a caption is still waiting for its footnote, i.e. a chart
    /// may continue onto the next page.
    pub fn has_unmatched_caption(&self) -> bool {
        self.footnotes.len() < self.captions.len()
    }

    /// Horizontal span available to charts on this page.
    pub fn content_width(&self) -> f64 {
        (self.right_extent - self.left_extent).abs()
    }

    fn extend_extents(&mut self, bbox: &BBox) {
        self.left_extent = self.left_extent.min(bbox.x0);
        self.right_extent = self.right_extent.max(bbox.x1);
    }
}

/// Scan one page.
///
/// `previous` is the layout of the page scanned just before this one. It is
/// only consulted (and possibly amended) when its index is `index - 1`.
pub fn scan_page(
    index: usize,
    size: PageSize,
    elements: &[LayoutElement],
    patterns: &LabelPatterns,
    previous: Option<&mut PageLayout>,
) -> PageLayout {
    let mut page = PageLayout::new(index, size);
    let mut previous = previous.filter(|prev| prev.index + 1 == index);
    let mut text_count = 0usize;
    let mut first_text = String::new();

    for element in elements {
        page.extend_extents(&element.bbox);

        let Some(raw) = element.text.as_deref() else {
            continue;
        };
        let text = raw.trim();
        text_count += 1;
        if text_count == 1 {
            first_text = text.to_string();
        }

        match patterns.classify(text) {
            Some(Classification::Caption(caption)) => {
                page.captions.push(LabeledBox::plain(element.bbox, caption));
            }
            Some(Classification::Footnote(footnote)) => {
                page.footnotes.push(LabeledBox::plain(element.bbox, footnote));
                if page.captions.is_empty() {
                    let resolution = resolve_orphan_footnote(
                        &mut page,
                        previous.as_deref_mut(),
                        text_count == 1,
                        &first_text,
                    );
                    debug!(page = index, ?resolution, "footnote before any caption");
                }
            }
            None => {}
        }
    }

    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Label;

    fn patterns() -> LabelPatterns {
        LabelPatterns::default()
    }

    fn size() -> PageSize {
        PageSize::new(600.0, 800.0)
    }

    #[test]
    fn extents_cover_every_element() {
        let elements = vec![
            LayoutElement::graphic(BBox::new(40.0, 200.0, 560.0, 600.0)),
            LayoutElement::text(BBox::new(60.0, 700.0, 300.0, 720.0), "Body text"),
        ];
        let page = scan_page(0, size(), &elements, &patterns(), None);
        assert_eq!(page.left_extent, 40.0);
        assert_eq!(page.right_extent, 560.0);
        assert_eq!(page.content_width(), 520.0);
    }

    #[test]
    fn empty_page_keeps_inverted_extents() {
        let page = scan_page(0, size(), &[], &patterns(), None);
        assert_eq!(page.left_extent, 600.0);
        assert_eq!(page.right_extent, 0.0);
        assert!(page.captions.is_empty());
    }

    #[test]
    fn captions_and_footnotes_pair_up() {
        let elements = vec![
            LayoutElement::text(BBox::new(10.0, 700.0, 200.0, 720.0), "Fig 1: Sample"),
            LayoutElement::graphic(BBox::new(10.0, 120.0, 200.0, 690.0)),
            LayoutElement::text(BBox::new(10.0, 100.0, 200.0, 115.0), "Source: Test"),
        ];
        let page = scan_page(0, size(), &elements, &patterns(), None);
        assert_eq!(page.captions.len(), 1);
        assert_eq!(page.footnotes.len(), page.captions.len());
        assert_eq!(page.captions[0].label, Label::plain("Fig 1: Sample"));
        assert_eq!(page.footnotes[0].label, Label::plain("Source: Test"));
        assert!(!page.has_unmatched_caption());
    }

    #[test]
    fn whitespace_is_trimmed_before_classification() {
        let elements = vec![LayoutElement::text(
            BBox::new(10.0, 700.0, 200.0, 720.0),
            "  \n图 2：营收结构\n",
        )];
        let page = scan_page(0, size(), &elements, &patterns(), None);
        assert_eq!(page.captions[0].label.text, "图 2：营收结构");
    }

    #[test]
    fn non_adjacent_previous_page_is_ignored() {
        let mut earlier = PageLayout::new(0, size());
        earlier
            .captions
            .push(LabeledBox::plain(BBox::new(10.0, 300.0, 200.0, 320.0), "图 1：A"));

        let elements = vec![
            LayoutElement::text(BBox::new(10.0, 700.0, 200.0, 720.0), "正文"),
            LayoutElement::text(BBox::new(10.0, 600.0, 200.0, 615.0), "资料来源：Wind"),
        ];
        let page = scan_page(2, size(), &elements, &patterns(), Some(&mut earlier));
        assert!(earlier.footnotes.is_empty());
        assert!(page.footnotes.is_empty());
        assert!(page.captions.is_empty());
    }
}
