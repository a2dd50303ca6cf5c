//! pdfium-backed [`DocumentSource`].
//!
//! Layout elements are the page's text segments grouped into blocks, plus
//! the bounds of every non-text page object. Rendering uses pdfium's bitmap
//! renderer scaled by the requested zoom.

use std::fs;
use std::path::{Path, PathBuf};

use chartcrop_core::{BBox, LayoutElement, PageSize};
use pdfium_render::prelude::*;
use tracing::debug;

use crate::backend::{DocumentSource, page_image_path};
use crate::blocks::group_text_runs;
use crate::error::BackendError;

/// Bind the pdfium library, trying `./` first and then the system library.
///
/// # Errors
///
/// Returns [`BackendError::Document`] if no pdfium library can be loaded.
pub fn bind_pdfium() -> Result<Pdfium, BackendError> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| BackendError::Document(format!("failed to bind pdfium library: {e}")))?;
    Ok(Pdfium::new(bindings))
}

/// A PDF document opened through pdfium.
pub struct PdfiumSource<'a> {
    document: PdfDocument<'a>,
}

impl<'a> PdfiumSource<'a> {
    /// Open `path`, optionally with a password, and check that text
    /// extraction is permitted.
    ///
    /// # Errors
    ///
    /// - [`BackendError::PasswordRequired`] / [`BackendError::InvalidPassword`]
    ///   for encrypted documents that cannot be opened.
    /// - [`BackendError::ExtractionNotAllowed`] if the permissions deny text
    ///   extraction.
    /// - [`BackendError::Document`] for any other load failure.
    pub fn open(
        pdfium: &'a Pdfium,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Self, BackendError> {
        let document = pdfium
            .load_pdf_from_file(path, password)
            .map_err(|e| map_load_error(e, password.is_some()))?;

        let allowed = document
            .permissions()
            .can_extract_text_and_graphics()
            .map_err(|e| BackendError::Document(e.to_string()))?;
        if !allowed {
            return Err(BackendError::ExtractionNotAllowed);
        }

        debug!(
            path = %path.display(),
            pages = document.pages().len(),
            "opened document"
        );
        Ok(Self { document })
    }

    fn page(&self, index: usize) -> Result<PdfPage<'_>, BackendError> {
        let count = self.page_count();
        let out_of_range = || BackendError::PageOutOfRange { index, count };
        let page_index = PdfPageIndex::try_from(index).map_err(|_| out_of_range())?;
        if index >= count {
            return Err(out_of_range());
        }
        self.document
            .pages()
            .get(page_index)
            .map_err(|e| BackendError::Document(e.to_string()))
    }
}

fn map_load_error(err: PdfiumError, has_password: bool) -> BackendError {
    match err {
        PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError) => {
            if has_password {
                BackendError::InvalidPassword
            } else {
                BackendError::PasswordRequired
            }
        }
        other => BackendError::Document(other.to_string()),
    }
}

impl DocumentSource for PdfiumSource<'_> {
    fn page_count(&self) -> usize {
        usize::try_from(self.document.pages().len()).unwrap_or(0)
    }

    fn page_size(&self, index: usize) -> Result<PageSize, BackendError> {
        let page = self.page(index)?;
        Ok(PageSize::new(
            f64::from(page.width().value),
            f64::from(page.height().value),
        ))
    }

    fn layout_elements(&self, index: usize) -> Result<Vec<LayoutElement>, BackendError> {
        let page = self.page(index)?;
        let text = page
            .text()
            .map_err(|e| BackendError::Document(format!("failed to read page text: {e}")))?;

        let runs: Vec<LayoutElement> = text
            .segments()
            .iter()
            .map(|segment| {
                let bounds = segment.bounds();
                let bbox = BBox::new(
                    f64::from(bounds.left().value),
                    f64::from(bounds.bottom().value),
                    f64::from(bounds.right().value),
                    f64::from(bounds.top().value),
                );
                LayoutElement::text(bbox, segment.text())
            })
            .collect();
        let mut elements = group_text_runs(&runs);

        // paths, images and shadings only widen the page extents
        for object in page.objects().iter() {
            if matches!(object.object_type(), PdfPageObjectType::Text) {
                continue;
            }
            let Ok(bounds) = object.bounds() else {
                continue;
            };
            elements.push(LayoutElement::graphic(BBox::new(
                f64::from(bounds.left().value),
                f64::from(bounds.bottom().value),
                f64::from(bounds.right().value),
                f64::from(bounds.top().value),
            )));
        }

        debug!(page = index, runs = runs.len(), elements = elements.len(), "read layout");
        Ok(elements)
    }

    fn render_page(&self, index: usize, zoom: f32, dir: &Path) -> Result<PathBuf, BackendError> {
        let page = self.page(index)?;
        let bitmap = page
            .render_with_config(&PdfRenderConfig::new().scale_page_by_factor(zoom))
            .map_err(|e| BackendError::Render {
                page: index,
                message: e.to_string(),
            })?;

        fs::create_dir_all(dir)?;
        let path = page_image_path(dir, index);
        bitmap
            .as_image()
            .save(&path)
            .map_err(|e| BackendError::Render {
                page: index,
                message: format!("failed to save {}: {e}", path.display()),
            })?;
        debug!(page = index, path = %path.display(), "rendered page");
        Ok(path)
    }
}
