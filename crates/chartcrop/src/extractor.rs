//! The extraction pipeline: scan, render, crop and stitch a whole document.

use std::fs;
use std::path::{Path, PathBuf};

use chartcrop_core::{
    ChartError, ExtractOptions, ExtractWarning, ExtractWarningCode, PageLayout, PagePlan,
    PageWindow, plan_page,
};
use chartcrop_render::DocumentSource;
use tracing::{debug, info, warn};

use crate::cropper::RegionCropper;
use crate::stitcher::stitch_continuations;

/// Where output goes and which pages to process.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Directory receiving the cropped charts.
    pub output_dir: PathBuf,
    /// Directory receiving rendered pages (default: `<output_dir>/pages`).
    pub pages_dir: Option<PathBuf>,
    /// 0-based pages to process (default: all). Sorted and deduplicated
    /// before use.
    pub pages: Option<Vec<usize>>,
    pub options: ExtractOptions,
}

impl ExtractorConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            pages_dir: None,
            pages: None,
            options: ExtractOptions::default(),
        }
    }

    /// Directory rendered pages are written to.
    pub fn pages_dir(&self) -> PathBuf {
        self.pages_dir
            .clone()
            .unwrap_or_else(|| self.output_dir.join("pages"))
    }
}

/// Summary of an extraction run.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractionReport {
    pub pages_scanned: usize,
    /// Final chart images on disk, stitched ones included.
    pub crops: Vec<PathBuf>,
    /// The subset of `crops` that were merged from two halves.
    pub stitched: Vec<PathBuf>,
    pub warnings: Vec<ExtractWarning>,
}

/// Drives a [`DocumentSource`] through the page window, the cropper and the
/// stitcher.
///
/// # Example
///
/// ```ignore
/// let pdfium = bind_pdfium()?;
/// let source = PdfiumSource::open(&pdfium, Path::new("report.pdf"), None)?;
/// let report = ChartExtractor::new(source, ExtractorConfig::new("charts")).run()?;
/// for path in &report.crops {
///     println!("{}", path.display());
/// }
/// ```
pub struct ChartExtractor<S> {
    source: S,
    config: ExtractorConfig,
}

impl<S: DocumentSource> ChartExtractor<S> {
    pub fn new(source: S, config: ExtractorConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Selected page indices in increasing order.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::Other`] if a selected page does not exist.
    pub fn page_indices(&self) -> Result<Vec<usize>, ChartError> {
        let count = self.source.page_count();
        let Some(selected) = &self.config.pages else {
            return Ok((0..count).collect());
        };
        let mut pages = selected.clone();
        pages.sort_unstable();
        pages.dedup();
        if let Some(&bad) = pages.iter().find(|&&p| p >= count) {
            return Err(ChartError::Other(format!(
                "page {} does not exist (document has {count} pages)",
                bad + 1
            )));
        }
        Ok(pages)
    }

    /// Locate chart regions on every selected page without rendering.
    ///
    /// # Errors
    ///
    /// Returns an error if a page's layout cannot be read.
    pub fn scan(&self) -> Result<Vec<PagePlan>, ChartError> {
        let mut window = PageWindow::new(self.config.options.patterns.clone());
        let mut plans = Vec::new();
        for index in self.page_indices()? {
            let input = self.source.page_input(index)?;
            if let Some(done) = window.push(input)? {
                plans.push(plan_page(&done));
            }
        }
        if let Some(last) = window.finish() {
            plans.push(plan_page(&last));
        }
        Ok(plans)
    }

    /// Run the full pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the output directories cannot be created or a
    /// page's layout cannot be read. Render, crop and stitch failures are
    /// reported as warnings instead.
    pub fn run(&self) -> Result<ExtractionReport, ChartError> {
        self.run_with_progress(|_, _| {})
    }

    /// Like [`run`](Self::run), calling `progress(done, total)` before each
    /// page is processed.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub fn run_with_progress(
        &self,
        mut progress: impl FnMut(usize, usize),
    ) -> Result<ExtractionReport, ChartError> {
        let options = &self.config.options;
        let pages_dir = self.config.pages_dir();
        fs::create_dir_all(&self.config.output_dir)?;
        fs::create_dir_all(&pages_dir)?;

        let indices = self.page_indices()?;
        let mut window = PageWindow::new(options.patterns.clone());
        let mut cropper = RegionCropper::new(&self.config.output_dir, options.margin);
        let mut warnings = Vec::new();

        for (done, &index) in indices.iter().enumerate() {
            progress(done, indices.len());
            let mut input = self.source.page_input(index)?;
            match self.source.render_page(index, options.zoom, &pages_dir) {
                Ok(path) => input.image_path = Some(path),
                Err(e) => {
                    warn!(page = index, error = %e, "page render failed");
                    warnings.push(
                        ExtractWarning::with_code(ExtractWarningCode::RenderFailed, e.to_string())
                            .on_page(index),
                    );
                }
            }
            if let Some(finished) = window.push(input)? {
                self.finish_page(&mut cropper, &finished, &mut warnings);
            }
        }
        if let Some(last) = window.finish() {
            self.finish_page(&mut cropper, &last, &mut warnings);
        }
        progress(indices.len(), indices.len());

        if !options.keep_page_images {
            // only succeeds once every page image is gone
            if fs::remove_dir(&pages_dir).is_ok() {
                debug!(dir = %pages_dir.display(), "removed page image directory");
            }
        }

        let (records, crop_warnings) = cropper.finish();
        warnings.extend(crop_warnings);
        let stitched = stitch_continuations(records);
        warnings.extend(stitched.warnings);

        let report = ExtractionReport {
            pages_scanned: indices.len(),
            crops: stitched.value.records.into_iter().map(|r| r.path).collect(),
            stitched: stitched.value.stitched,
            warnings,
        };
        info!(
            pages = report.pages_scanned,
            crops = report.crops.len(),
            stitched = report.stitched.len(),
            warnings = report.warnings.len(),
            "extraction finished"
        );
        Ok(report)
    }

    fn finish_page(
        &self,
        cropper: &mut RegionCropper,
        page: &PageLayout,
        warnings: &mut Vec<ExtractWarning>,
    ) {
        let written = cropper.crop_page(page);
        debug!(page = page.index, crops = written, "page finished");

        if self.config.options.keep_page_images {
            return;
        }
        if let Some(path) = page.image_path.as_deref() {
            discard_page_image(path, page.index, warnings);
        }
    }
}

fn discard_page_image(path: &Path, page: usize, warnings: &mut Vec<ExtractWarning>) {
    if let Err(e) = fs::remove_file(path) {
        warn!(page, path = %path.display(), error = %e, "cannot remove page image");
        warnings.push(
            ExtractWarning::new(format!("cannot remove page image {}: {e}", path.display()))
                .on_page(page),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartcrop_core::{BBox, LayoutElement, PageSize};
    use chartcrop_render::{MemoryPage, MemorySource};

    fn one_chart_page() -> MemoryPage {
        MemoryPage::new(
            PageSize::new(600.0, 800.0),
            vec![
                LayoutElement::text(BBox::new(10.0, 700.0, 200.0, 720.0), "Fig 1: Sample"),
                LayoutElement::text(BBox::new(10.0, 100.0, 200.0, 115.0), "Source: Test"),
            ],
        )
    }

    #[test]
    fn default_pages_dir_is_under_output() {
        let config = ExtractorConfig::new("out");
        assert_eq!(config.pages_dir(), PathBuf::from("out/pages"));
    }

    #[test]
    fn page_selection_is_sorted_and_checked() {
        let source: MemorySource = (0..4).map(|_| one_chart_page()).collect();
        let mut config = ExtractorConfig::new("unused");
        config.pages = Some(vec![3, 1, 3]);
        let extractor = ChartExtractor::new(source.clone(), config.clone());
        assert_eq!(extractor.page_indices().unwrap(), vec![1, 3]);

        config.pages = Some(vec![4]);
        let err = ChartExtractor::new(source, config).page_indices().unwrap_err();
        assert!(err.to_string().contains("page 5 does not exist"));
    }

    #[test]
    fn scan_plans_every_page_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let source: MemorySource = (0..2).map(|_| one_chart_page()).collect();
        let extractor = ChartExtractor::new(source, ExtractorConfig::new(dir.path().join("out")));

        let plans = extractor.scan().unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[1].page, 1);
        assert_eq!(plans[0].placements.len(), 1);
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn progress_reports_every_page() {
        let dir = tempfile::tempdir().unwrap();
        let source: MemorySource = (0..3).map(|_| one_chart_page()).collect();
        let extractor = ChartExtractor::new(source, ExtractorConfig::new(dir.path()));

        let mut calls = Vec::new();
        extractor
            .run_with_progress(|done, total| calls.push((done, total)))
            .unwrap();
        assert_eq!(calls, vec![(0, 3), (1, 3), (2, 3), (3, 3)]);
    }

    #[test]
    fn discarded_page_images_leave_no_pages_dir() {
        let dir = tempfile::tempdir().unwrap();
        let source = MemorySource::new().with_page(one_chart_page());
        let mut config = ExtractorConfig::new(dir.path());
        config.options.keep_page_images = false;

        let report = ChartExtractor::new(source, config).run().unwrap();
        assert!(report.warnings.is_empty());
        assert_eq!(report.crops.len(), 1);
        assert!(!dir.path().join("pages").exists());
    }
}
