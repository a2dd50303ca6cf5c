//! chartcrop: Locate, crop and stitch charts and tables in PDF reports.
//!
//! Charts are found from their text labels alone: a caption ("图 3：…",
//! "Figure 3: …") above and a source footnote ("资料来源：…", "Source: …")
//! below. Every page is rendered, each caption/footnote pair is cropped out
//! of the page image, and charts cut in half by a page break are stitched
//! back together.
//!
//! # Architecture
//!
//! - **chartcrop-core**: Backend-independent layout analysis (no I/O)
//! - **chartcrop-render**: Document backends (pdfium, in-memory)
//! - **chartcrop** (this crate): Cropping, stitching and the extraction pipeline
//!
//! # Example
//!
//! ```ignore
//! let report = chartcrop::extract_file(
//!     Path::new("report.pdf"),
//!     None,
//!     ExtractorConfig::new("charts"),
//! )?;
//! println!("{} charts", report.crops.len());
//! ```

pub mod cropper;
pub mod extractor;
pub mod stitcher;

use std::path::Path;

pub use chartcrop_core;
pub use chartcrop_core::{
    BBox, ChartError, ChartRegion, ExtractOptions, ExtractWarning, ExtractWarningCode, Label,
    LabelPatterns, Level, PagePlan, PageSize,
};
pub use chartcrop_render;
pub use chartcrop_render::{
    DocumentSource, MemoryPage, MemorySource, Pdfium, PdfiumSource, bind_pdfium,
};
pub use cropper::{CropError, CropRecord, RegionCropper, crop_file_name, sanitize_file_stem};
pub use extractor::{ChartExtractor, ExtractionReport, ExtractorConfig};
pub use stitcher::{StitchError, StitchOutcome, stack_vertically, stitch_continuations, stitch_pair};

/// Extract every chart from the PDF at `path` with pdfium.
///
/// # Errors
///
/// Returns an error if pdfium cannot be loaded, the document cannot be
/// opened (including password and permission failures), or the output
/// directories cannot be created.
pub fn extract_file(
    path: &Path,
    password: Option<&str>,
    config: ExtractorConfig,
) -> Result<ExtractionReport, ChartError> {
    let pdfium = bind_pdfium()?;
    let source = PdfiumSource::open(&pdfium, path, password)?;
    ChartExtractor::new(source, config).run()
}
