//! Cross-page chart resolution.
//!
//! A footnote that shows up on a page before any caption either closes a
//! chart whose caption sat on the previous page, stands in for a caption
//! when it is the page's very first text, or is a false positive.

use crate::geometry::BBox;
use crate::label::{Label, LabeledBox};
use crate::scan::PageLayout;

/// Outcome of [`resolve_orphan_footnote`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The previous page's trailing caption was closed at its page bottom and
    /// a continuation caption was opened at the top of the current page.
    Continued,
    /// No open chart upstream; the footnote is the page's first text, so a
    /// caption labeled with that text was opened at the top of the page.
    PromotedFirstText,
    /// No pairing possible; the footnote was removed.
    Dropped,
}

/// Resolve the most recent footnote on `current`, recorded while `current`
/// has no caption yet.
///
/// `previous` must be the immediately preceding page or `None`.
/// `is_first_text` tells whether the footnote came from the first text
/// element of the page, whose trimmed text is `first_text`.
pub fn resolve_orphan_footnote(
    current: &mut PageLayout,
    previous: Option<&mut PageLayout>,
    is_first_text: bool,
    first_text: &str,
) -> Resolution {
    let top = BBox::page_top(current.size.height);

    if let Some(prev) = previous.filter(|prev| prev.has_unmatched_caption()) {
        let text = prev
            .captions
            .last()
            .map(|caption| caption.label.text.clone())
            .unwrap_or_default();
        prev.footnotes.push(LabeledBox::page_bottom());
        current
            .captions
            .push(LabeledBox::new(top, Label::continuation(text)));
        return Resolution::Continued;
    }

    if is_first_text {
        current.captions.push(LabeledBox::plain(top, first_text));
        Resolution::PromotedFirstText
    } else {
        current.footnotes.pop();
        Resolution::Dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PageSize;

    fn page_with_caption(index: usize) -> PageLayout {
        let mut page = PageLayout::new(index, PageSize::new(595.0, 842.0));
        page.captions.push(LabeledBox::plain(
            BBox::new(30.0, 200.0, 250.0, 212.0),
            "图 5：用户规模",
        ));
        page
    }

    fn page_with_orphan(index: usize) -> PageLayout {
        let mut page = PageLayout::new(index, PageSize::new(595.0, 842.0));
        page.footnotes.push(LabeledBox::plain(
            BBox::new(30.0, 600.0, 250.0, 610.0),
            "资料来源：公司公告",
        ));
        page
    }

    #[test]
    fn unmatched_caption_upstream_continues() {
        let mut prev = page_with_caption(3);
        let mut current = page_with_orphan(4);

        let res = resolve_orphan_footnote(&mut current, Some(&mut prev), false, "正文");

        assert_eq!(res, Resolution::Continued);
        assert_eq!(prev.footnotes, vec![LabeledBox::page_bottom()]);
        assert!(!prev.has_unmatched_caption());
        assert_eq!(current.captions.len(), 1);
        assert_eq!(current.captions[0].bbox, BBox::new(0.0, 842.0, 0.0, 842.0));
        assert_eq!(current.captions[0].label, Label::continuation("图 5：用户规模"));
        assert_eq!(current.footnotes.len(), 1);
    }

    #[test]
    fn matched_previous_page_drops_footnote() {
        let mut prev = page_with_caption(3);
        prev.footnotes.push(LabeledBox::plain(
            BBox::new(30.0, 80.0, 250.0, 90.0),
            "资料来源：Wind",
        ));
        let mut current = page_with_orphan(4);

        let res = resolve_orphan_footnote(&mut current, Some(&mut prev), false, "正文");

        assert_eq!(res, Resolution::Dropped);
        assert!(current.footnotes.is_empty());
        assert!(current.captions.is_empty());
        assert_eq!(prev.footnotes.len(), 1);
    }

    #[test]
    fn first_text_footnote_becomes_caption() {
        let mut current = page_with_orphan(0);

        let res = resolve_orphan_footnote(&mut current, None, true, "资料来源：公司公告");

        assert_eq!(res, Resolution::PromotedFirstText);
        assert_eq!(current.captions.len(), 1);
        assert_eq!(current.captions[0].label, Label::plain("资料来源：公司公告"));
        assert_eq!(current.footnotes.len(), 1);
    }

    #[test]
    fn no_previous_page_and_not_first_text_drops() {
        let mut current = page_with_orphan(0);
        let res = resolve_orphan_footnote(&mut current, None, false, "Header");
        assert_eq!(res, Resolution::Dropped);
        assert!(current.footnotes.is_empty());
    }

    #[test]
    fn continuation_of_continuation_keeps_text() {
        let mut prev = PageLayout::new(5, PageSize::new(595.0, 842.0));
        prev.captions.push(LabeledBox::new(
            BBox::page_top(842.0),
            Label::continuation("图 9：估值表"),
        ));
        let mut current = page_with_orphan(6);

        let res = resolve_orphan_footnote(&mut current, Some(&mut prev), false, "x");

        assert_eq!(res, Resolution::Continued);
        assert_eq!(current.captions[0].label, Label::continuation("图 9：估值表"));
    }
}
