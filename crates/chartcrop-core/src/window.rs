//! Two-slot sliding window over pages.
//!
//! Continuation resolution on page N may amend page N-1, so a page is only
//! final once the page after it has been scanned. [`PageWindow`] holds the
//! last scanned page and hands it back, finalized, when the next one arrives.

use std::path::PathBuf;

use crate::error::ChartError;
use crate::geometry::PageSize;
use crate::label::LabelPatterns;
use crate::scan::{LayoutElement, PageLayout, scan_page};

/// One page's worth of backend output.
#[derive(Debug, Clone)]
pub struct PageInput {
    pub index: usize,
    pub size: PageSize,
    pub elements: Vec<LayoutElement>,
    pub image_path: Option<PathBuf>,
}

/// Sequential fold over pages in increasing index order.
///
/// # Example
///
/// ```ignore
/// let mut window = PageWindow::new(LabelPatterns::default());
/// for input in pages {
///     if let Some(done) = window.push(input)? {
///         crop(done);
///     }
/// }
/// if let Some(last) = window.finish() {
///     crop(last);
/// }
/// ```
#[derive(Debug)]
pub struct PageWindow {
    patterns: LabelPatterns,
    previous: Option<PageLayout>,
}

impl PageWindow {
    pub fn new(patterns: LabelPatterns) -> Self {
        Self {
            patterns,
            previous: None,
        }
    }

    /// Scan `input` and return the page before it, which can no longer change.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::PageOrder`] if `input.index` is not greater than
    /// the index of the page currently held.
    pub fn push(&mut self, input: PageInput) -> Result<Option<PageLayout>, ChartError> {
        if let Some(prev) = &self.previous {
            if input.index <= prev.index {
                return Err(ChartError::PageOrder {
                    previous: prev.index,
                    current: input.index,
                });
            }
        }

        let mut current = scan_page(
            input.index,
            input.size,
            &input.elements,
            &self.patterns,
            self.previous.as_mut(),
        );
        current.image_path = input.image_path;
        Ok(self.previous.replace(current))
    }

    /// The most recently scanned page, still open to amendment.
    pub fn pending(&self) -> Option<&PageLayout> {
        self.previous.as_ref()
    }

    /// Close the window, returning the last page.
    pub fn finish(self) -> Option<PageLayout> {
        self.previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BBox;
    use crate::label::Label;

    fn input(index: usize, elements: Vec<LayoutElement>) -> PageInput {
        PageInput {
            index,
            size: PageSize::new(600.0, 800.0),
            elements,
            image_path: Some(PathBuf::from(format!("{index}.png"))),
        }
    }

    #[test]
    fn push_returns_previous_page() {
        let mut window = PageWindow::new(LabelPatterns::default());
        assert!(window.push(input(0, vec![])).unwrap().is_none());
        let done = window.push(input(1, vec![])).unwrap().unwrap();
        assert_eq!(done.index, 0);
        assert_eq!(done.image_path, Some(PathBuf::from("0.png")));
        assert_eq!(window.pending().map(|p| p.index), Some(1));
        assert_eq!(window.finish().map(|p| p.index), Some(1));
    }

    #[test]
    fn out_of_order_push_is_rejected() {
        let mut window = PageWindow::new(LabelPatterns::default());
        window.push(input(3, vec![])).unwrap();
        let err = window.push(input(3, vec![])).unwrap_err();
        assert_eq!(
            err,
            ChartError::PageOrder {
                previous: 3,
                current: 3
            }
        );
    }

    #[test]
    fn continuation_amends_page_before_it_is_released() {
        let mut window = PageWindow::new(LabelPatterns::default());
        window
            .push(input(
                0,
                vec![LayoutElement::text(
                    BBox::new(30.0, 150.0, 250.0, 165.0),
                    "表 9：利润表",
                )],
            ))
            .unwrap();

        let first = window
            .push(input(
                1,
                vec![
                    LayoutElement::text(BBox::new(30.0, 760.0, 250.0, 780.0), "公司深度报告"),
                    LayoutElement::text(BBox::new(30.0, 500.0, 250.0, 510.0), "资料来源：公司财报"),
                ],
            ))
            .unwrap()
            .unwrap();

        assert_eq!(first.captions.len(), first.footnotes.len());
        assert_eq!(first.footnotes[0].bbox, BBox::zero());

        let second = window.finish().unwrap();
        assert_eq!(second.captions[0].label, Label::continuation("表 9：利润表"));
        assert_eq!(second.captions.len(), second.footnotes.len());
    }
}
