//! Cropping placed regions out of rendered page images.

use std::path::{Path, PathBuf};

use chartcrop_core::{ExtractWarning, ExtractWarningCode, Label, PageLayout, PixelRect, plan_page};
use image::{DynamicImage, GenericImageView};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Error type for a single crop.
#[derive(Debug, Error)]
pub enum CropError {
    /// The page image could not be decoded or the crop could not be encoded.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Error reading or writing an image file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The crop rectangle is empty once mapped onto the page image.
    #[error("crop rectangle for {label:?} is empty")]
    Degenerate { label: String },
}

/// A crop written to disk.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CropRecord {
    /// Label of the caption the crop belongs to.
    pub label: Label,
    /// 0-based page the crop was taken from.
    pub page: usize,
    pub path: PathBuf,
}

/// Make `text` usable as a file stem.
///
/// Path separators become `_` and control characters are dropped. Text that
/// ends up blank falls back to `page<N>_chart<I>` (both 1-based).
pub fn sanitize_file_stem(text: &str, page: usize, order: usize) -> String {
    let stem: String = text
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    if stem.trim().is_empty() {
        format!("page{}_chart{}", page + 1, order + 1)
    } else {
        stem
    }
}

/// File name for a crop of `label` taken from `page`.
///
/// Continuation halves carry an `@continued-p<N>` suffix so they never
/// collide with the upper half or with each other.
pub fn crop_file_name(label: &Label, page: usize, order: usize) -> String {
    let stem = sanitize_file_stem(&label.text, page, order);
    if label.is_continuation {
        format!("{stem}@continued-p{}.png", page + 1)
    } else {
        format!("{stem}.png")
    }
}

/// Crop one region out of a page image and save it to `path`.
///
/// # Errors
///
/// Returns [`CropError::Degenerate`] for an empty rectangle, or an image
/// error if the crop cannot be written.
pub fn crop_region(
    image: &DynamicImage,
    rect: &PixelRect,
    label: &Label,
    path: &Path,
) -> Result<(), CropError> {
    let (x, y, width, height) = rect.to_crop().ok_or_else(|| CropError::Degenerate {
        label: label.text.clone(),
    })?;
    image.crop_imm(x, y, width, height).save(path)?;
    Ok(())
}

/// Crops every region of finalized pages into one output directory.
///
/// Records are kept in write order. A crop whose path was already written
/// replaces the earlier record.
#[derive(Debug)]
pub struct RegionCropper {
    out_dir: PathBuf,
    margin: f64,
    records: Vec<CropRecord>,
    warnings: Vec<ExtractWarning>,
}

impl RegionCropper {
    pub fn new(out_dir: impl Into<PathBuf>, margin: f64) -> Self {
        Self {
            out_dir: out_dir.into(),
            margin,
            records: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn records(&self) -> &[CropRecord] {
        &self.records
    }

    pub fn warnings(&self) -> &[ExtractWarning] {
        &self.warnings
    }

    /// Crop every placed region of `page` from its rendered image.
    ///
    /// Returns the number of crops written. Failures are recorded as
    /// warnings and the remaining regions still get cropped.
    pub fn crop_page(&mut self, page: &PageLayout) -> usize {
        let plan = plan_page(page);
        if plan.is_empty() {
            return 0;
        }
        let Some(image_path) = page.image_path.as_deref() else {
            debug!(page = page.index, "no page image, skipping regions");
            return 0;
        };

        let image = match image::open(image_path) {
            Ok(image) => image,
            Err(e) => {
                warn!(page = page.index, error = %e, "cannot read page image");
                self.warnings.push(
                    ExtractWarning::with_code(
                        ExtractWarningCode::CropFailed,
                        format!("cannot read page image {}: {e}", image_path.display()),
                    )
                    .on_page(page.index),
                );
                return 0;
            }
        };
        let (image_width, image_height) = image.dimensions();

        let mut written = 0;
        for (order, placement) in plan.placements.iter().enumerate() {
            let rect = PixelRect::from_page_box(
                &placement.bbox,
                page.size,
                image_width,
                image_height,
                self.margin,
            );
            let path = self
                .out_dir
                .join(crop_file_name(&placement.label, page.index, order));

            match crop_region(&image, &rect, &placement.label, &path) {
                Ok(()) => {
                    info!(page = page.index, path = %path.display(), "wrote crop");
                    self.record(CropRecord {
                        label: placement.label.clone(),
                        page: page.index,
                        path,
                    });
                    written += 1;
                }
                Err(e) => {
                    warn!(
                        page = page.index,
                        label = %placement.label.text,
                        error = %e,
                        "crop failed"
                    );
                    self.warnings.push(
                        ExtractWarning::with_code(ExtractWarningCode::CropFailed, e.to_string())
                            .on_page(page.index)
                            .for_element(placement.label.text.clone()),
                    );
                }
            }
        }
        written
    }

    fn record(&mut self, record: CropRecord) {
        if let Some(pos) = self.records.iter().position(|r| r.path == record.path) {
            let earlier = self.records.remove(pos);
            warn!(
                path = %record.path.display(),
                earlier_page = earlier.page,
                "crop file overwritten"
            );
            self.warnings.push(
                ExtractWarning::with_code(
                    ExtractWarningCode::OverwrittenCrop,
                    format!(
                        "{} from page {} replaced the crop from page {}",
                        record.path.display(),
                        record.page,
                        earlier.page
                    ),
                )
                .on_page(record.page)
                .for_element(record.label.text.clone()),
            );
        }
        self.records.push(record);
    }

    /// Consume the cropper, returning the records and warnings.
    pub fn finish(self) -> (Vec<CropRecord>, Vec<ExtractWarning>) {
        (self.records, self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartcrop_core::{BBox, LabeledBox, PageSize};
    use image::{Rgb, RgbImage};

    #[test]
    fn sanitize_replaces_separators() {
        assert_eq!(sanitize_file_stem("图 1：收入/利润", 0, 0), "图 1：收入_利润");
        assert_eq!(sanitize_file_stem(r"Fig 2: A\B", 0, 0), "Fig 2: A_B");
    }

    #[test]
    fn sanitize_drops_control_characters() {
        assert_eq!(sanitize_file_stem("Fig 3:\tMix\u{7}", 0, 0), "Fig 3:Mix");
    }

    #[test]
    fn sanitize_falls_back_when_blank() {
        assert_eq!(sanitize_file_stem("", 4, 1), "page5_chart2");
        assert_eq!(sanitize_file_stem(" \n ", 0, 0), "page1_chart1");
    }

    #[test]
    fn continuation_file_name_has_page_suffix() {
        assert_eq!(
            crop_file_name(&Label::continuation("表 3：估值"), 6, 0),
            "表 3：估值@continued-p7.png"
        );
        assert_eq!(crop_file_name(&Label::plain("表 3：估值"), 5, 2), "表 3：估值.png");
    }

    fn page_with_image(dir: &Path, index: usize, caption: &str) -> PageLayout {
        let image_path = dir.join(format!("{index}.png"));
        RgbImage::from_pixel(600, 800, Rgb([200, 200, 200]))
            .save(&image_path)
            .unwrap();
        let mut page = PageLayout::new(index, PageSize::new(600.0, 800.0));
        page.captions.push(LabeledBox::plain(BBox::new(10.0, 700.0, 200.0, 720.0), caption));
        page.footnotes.push(LabeledBox::plain(
            BBox::new(10.0, 100.0, 200.0, 115.0),
            "Source: Test",
        ));
        page.left_extent = 10.0;
        page.right_extent = 200.0;
        page.image_path = Some(image_path);
        page
    }

    #[test]
    fn crops_region_with_margin() {
        let dir = tempfile::tempdir().unwrap();
        let page = page_with_image(dir.path(), 0, "Fig 1: Sample");
        let mut cropper = RegionCropper::new(dir.path(), 10.0);

        assert_eq!(cropper.crop_page(&page), 1);

        let path = dir.path().join("Fig 1: Sample.png");
        assert_eq!(cropper.records()[0].path, path);
        assert_eq!(image::open(&path).unwrap().dimensions(), (210, 640));
        assert!(cropper.warnings().is_empty());
    }

    #[test]
    fn same_name_on_later_page_replaces_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut cropper = RegionCropper::new(dir.path(), 10.0);
        cropper.crop_page(&page_with_image(dir.path(), 0, "图 1：重复"));
        cropper.crop_page(&page_with_image(dir.path(), 3, "图 1：重复"));

        let (records, warnings) = cropper.finish();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].page, 3);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, ExtractWarningCode::OverwrittenCrop);
    }

    #[test]
    fn unreadable_page_image_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let mut page = page_with_image(dir.path(), 0, "Fig 1: Sample");
        page.image_path = Some(dir.path().join("missing.png"));
        let mut cropper = RegionCropper::new(dir.path(), 10.0);

        assert_eq!(cropper.crop_page(&page), 0);
        assert_eq!(cropper.warnings()[0].code, ExtractWarningCode::CropFailed);
        assert_eq!(cropper.warnings()[0].page, Some(0));
    }

    #[test]
    fn degenerate_region_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut page = page_with_image(dir.path(), 0, "Fig 1: Offpage");
        // extents past the right edge of the page
        page.left_extent = 700.0;
        page.right_extent = 900.0;
        page.captions[0].bbox = BBox::new(700.0, 700.0, 900.0, 720.0);
        let mut cropper = RegionCropper::new(dir.path(), 10.0);

        assert_eq!(cropper.crop_page(&page), 0);
        assert!(cropper.records().is_empty());
        assert_eq!(cropper.warnings()[0].element.as_deref(), Some("Fig 1: Offpage"));
    }

    #[test]
    fn failed_region_does_not_stop_its_neighbour() {
        let dir = tempfile::tempdir().unwrap();
        let mut page = page_with_image(dir.path(), 0, "Fig 1: Sample");
        // second chart on the same level, far past the right edge of the image
        page.captions.push(LabeledBox::plain(
            BBox::new(1300.0, 700.0, 1500.0, 720.0),
            "Fig 2: Offpage",
        ));
        page.footnotes.push(LabeledBox::plain(
            BBox::new(1300.0, 100.0, 1500.0, 115.0),
            "Source: Test",
        ));
        page.right_extent = 1500.0;
        let mut cropper = RegionCropper::new(dir.path(), 10.0);

        assert_eq!(cropper.crop_page(&page), 1);

        assert_eq!(cropper.records().len(), 1);
        assert_eq!(cropper.records()[0].label.text, "Fig 1: Sample");
        assert!(dir.path().join("Fig 1: Sample.png").exists());
        assert!(!dir.path().join("Fig 2: Offpage.png").exists());
        assert_eq!(cropper.warnings().len(), 1);
        assert_eq!(cropper.warnings()[0].code, ExtractWarningCode::CropFailed);
        assert_eq!(cropper.warnings()[0].element.as_deref(), Some("Fig 2: Offpage"));
    }

    #[test]
    fn page_without_image_is_skipped_quietly() {
        let dir = tempfile::tempdir().unwrap();
        let mut page = page_with_image(dir.path(), 0, "Fig 1: Sample");
        page.image_path = None;
        let mut cropper = RegionCropper::new(dir.path(), 10.0);
        assert_eq!(cropper.crop_page(&page), 0);
        assert!(cropper.warnings().is_empty());
    }
}
