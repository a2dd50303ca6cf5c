//! In-memory document source.
//!
//! [`MemorySource`] serves pages whose layout was produced elsewhere (a
//! previous parse, a fixture, a different PDF library). Pages without a
//! supplied bitmap render as blank white canvases of the zoomed page size.

use std::fs;
use std::path::{Path, PathBuf};

use chartcrop_core::{LayoutElement, PageSize};
use image::{DynamicImage, Rgb, RgbImage};
use tracing::debug;

use crate::backend::{DocumentSource, page_image_path};
use crate::error::BackendError;

/// One page of a [`MemorySource`].
#[derive(Debug, Clone)]
pub struct MemoryPage {
    pub size: PageSize,
    pub elements: Vec<LayoutElement>,
    /// Bitmap written as-is by `render_page`, ignoring zoom.
    pub image: Option<DynamicImage>,
}

impl MemoryPage {
    pub fn new(size: PageSize, elements: Vec<LayoutElement>) -> Self {
        Self {
            size,
            elements,
            image: None,
        }
    }

    pub fn with_image(mut self, image: DynamicImage) -> Self {
        self.image = Some(image);
        self
    }
}

/// Document held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: Vec<MemoryPage>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page.
    pub fn with_page(mut self, page: MemoryPage) -> Self {
        self.pages.push(page);
        self
    }

    pub fn push_page(&mut self, page: MemoryPage) {
        self.pages.push(page);
    }

    fn page(&self, index: usize) -> Result<&MemoryPage, BackendError> {
        self.pages.get(index).ok_or(BackendError::PageOutOfRange {
            index,
            count: self.pages.len(),
        })
    }
}

impl FromIterator<MemoryPage> for MemorySource {
    fn from_iter<I: IntoIterator<Item = MemoryPage>>(iter: I) -> Self {
        Self {
            pages: iter.into_iter().collect(),
        }
    }
}

impl DocumentSource for MemorySource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_size(&self, index: usize) -> Result<PageSize, BackendError> {
        Ok(self.page(index)?.size)
    }

    fn layout_elements(&self, index: usize) -> Result<Vec<LayoutElement>, BackendError> {
        Ok(self.page(index)?.elements.clone())
    }

    fn render_page(&self, index: usize, zoom: f32, dir: &Path) -> Result<PathBuf, BackendError> {
        let page = self.page(index)?;
        fs::create_dir_all(dir)?;
        let path = page_image_path(dir, index);

        match &page.image {
            Some(image) => image.save(&path)?,
            None => {
                let zoom = f64::from(zoom);
                let width = (page.size.width * zoom).round().max(0.0) as u32;
                let height = (page.size.height * zoom).round().max(0.0) as u32;
                if width == 0 || height == 0 {
                    return Err(BackendError::Render {
                        page: index,
                        message: format!("empty canvas {width}x{height}"),
                    });
                }
                RgbImage::from_pixel(width, height, Rgb([255, 255, 255])).save(&path)?;
            }
        }

        debug!(page = index, path = %path.display(), "rendered in-memory page");
        Ok(path)
    }
}
