//! chartcrop-render: document backends for chart extraction.
//!
//! This crate implements the document side of chartcrop: reading positioned
//! text from each page and rendering pages to PNG. Backends sit behind the
//! [`DocumentSource`] trait. [`PdfiumSource`] (feature `pdfium`, on by
//! default) reads PDF files through pdfium; [`MemorySource`] serves layouts
//! that are already in memory.

pub mod backend;
pub mod blocks;
pub mod error;
pub mod memory;
#[cfg(feature = "pdfium")]
pub mod pdfium;

pub use backend::{DocumentSource, page_image_path};
pub use blocks::group_text_runs;
pub use chartcrop_core;
pub use error::BackendError;
pub use memory::{MemoryPage, MemorySource};
#[cfg(feature = "pdfium")]
pub use pdfium::{PdfiumSource, bind_pdfium};
#[cfg(feature = "pdfium")]
pub use pdfium_render::prelude::Pdfium;
