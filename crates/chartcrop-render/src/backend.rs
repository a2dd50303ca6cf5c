//! Document source trait.
//!
//! Defines the [`DocumentSource`] trait that abstracts the two things chart
//! extraction needs from a document: positioned layout elements per page and
//! a rendered bitmap of each page.

use std::path::{Path, PathBuf};

use chartcrop_core::{LayoutElement, PageInput, PageSize};

use crate::error::BackendError;

/// Trait abstracting document access and page rendering.
///
/// Page indices are 0-based. Coordinates use the page-space convention of
/// [`chartcrop_core::BBox`]: origin at the bottom-left, y growing upward.
///
/// Implementations check text-extraction permission when the document is
/// opened, so a source that exists is always allowed to be read.
///
/// # Usage
///
/// ```ignore
/// let count = source.page_count();
/// let size = source.page_size(0)?;
/// let elements = source.layout_elements(0)?;
/// let png = source.render_page(0, 2.0, Path::new("out/pages"))?;
/// ```
pub trait DocumentSource {
    /// Return the number of pages in the document.
    fn page_count(&self) -> usize;

    /// Canvas size of a page, in page units.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range or the page cannot be loaded.
    fn page_size(&self, index: usize) -> Result<PageSize, BackendError>;

    /// Layout elements of a page in a stable document order.
    ///
    /// # Errors
    ///
    /// Returns an error if the page or its text layer cannot be read.
    fn layout_elements(&self, index: usize) -> Result<Vec<LayoutElement>, BackendError>;

    /// Render a page at `zoom` times its natural size and write it to
    /// `<dir>/<index>.png`, returning that path.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or writing the image fails.
    fn render_page(&self, index: usize, zoom: f32, dir: &Path) -> Result<PathBuf, BackendError>;

    /// Size and layout of a page bundled for the page window, without an
    /// image path.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`page_size`](Self::page_size) and
    /// [`layout_elements`](Self::layout_elements).
    fn page_input(&self, index: usize) -> Result<PageInput, BackendError> {
        Ok(PageInput {
            index,
            size: self.page_size(index)?,
            elements: self.layout_elements(index)?,
            image_path: None,
        })
    }
}

/// Path a page image is written to.
pub fn page_image_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("{index}.png"))
}
