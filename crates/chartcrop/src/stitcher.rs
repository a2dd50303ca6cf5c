//! Merging the two halves of charts split across a page break.
//!
//! Crops are grouped by label text. A group holding one plain crop and one
//! continuation crop is stacked into a single image saved under the plain
//! crop's path; both fragment files are replaced by that image.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use chartcrop_core::{ExtractResult, ExtractWarning, ExtractWarningCode};
use image::{RgbImage, imageops};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cropper::CropRecord;

/// Error type for stitching one label group.
#[derive(Debug, Error)]
pub enum StitchError {
    /// More than two crops share a label, so no merge order is defined.
    #[error("{count} fragments share the label {label:?}")]
    TooManyFragments { label: String, count: usize },

    /// A fragment could not be decoded or the result could not be encoded.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Error removing a fragment file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Stack `upper` over `lower` into one RGB image.
///
/// The result is as wide as the narrower half and as tall as both together.
pub fn stack_vertically(upper: &RgbImage, lower: &RgbImage) -> RgbImage {
    let width = upper.width().min(lower.width());
    let mut canvas = RgbImage::new(width, upper.height() + lower.height());
    imageops::replace(&mut canvas, upper, 0, 0);
    imageops::replace(&mut canvas, lower, 0, i64::from(upper.height()));
    canvas
}

/// Merge a plain crop with its continuation half.
///
/// The merged image replaces the file at `upper.path` and the continuation
/// file is removed.
///
/// # Errors
///
/// Returns an error if either fragment cannot be read, or the merged image
/// cannot be written.
pub fn stitch_pair(upper: &CropRecord, lower: &CropRecord) -> Result<PathBuf, StitchError> {
    let top = image::open(&upper.path)?.to_rgb8();
    let bottom = image::open(&lower.path)?.to_rgb8();
    let merged = stack_vertically(&top, &bottom);

    merged.save(&upper.path)?;
    fs::remove_file(&lower.path)?;
    Ok(upper.path.clone())
}

/// Group records by label text, keeping first-seen order.
fn group_by_label(records: Vec<CropRecord>) -> Vec<Vec<CropRecord>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<CropRecord>> = Vec::new();
    for record in records {
        match index.get(&record.label.text) {
            Some(&i) => groups[i].push(record),
            None => {
                index.insert(record.label.text.clone(), groups.len());
                groups.push(vec![record]);
            }
        }
    }
    groups
}

/// Result of stitching a run's crops.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StitchOutcome {
    /// Crops remaining on disk, in group order.
    pub records: Vec<CropRecord>,
    /// Paths of merged images.
    pub stitched: Vec<PathBuf>,
}

/// Stitch every split chart in `records`.
///
/// The input order of the two halves does not matter; the continuation half
/// always goes below. Groups that cannot be stitched keep their fragments and
/// produce a warning.
pub fn stitch_continuations(records: Vec<CropRecord>) -> ExtractResult<StitchOutcome> {
    let mut outcome = StitchOutcome::default();
    let mut warnings = Vec::new();

    for mut group in group_by_label(records) {
        if group.len() > 2 {
            let err = StitchError::TooManyFragments {
                label: group[0].label.text.clone(),
                count: group.len(),
            };
            warn!(error = %err, "leaving fragments unstitched");
            let code = ExtractWarningCode::AmbiguousContinuation;
            warnings.push(
                ExtractWarning::with_code(code, err.to_string())
                    .for_element(group[0].label.text.clone()),
            );
            outcome.records.append(&mut group);
            continue;
        }

        let continuation = group.iter().position(|r| r.label.is_continuation);
        let plain = group.iter().position(|r| !r.label.is_continuation);
        let (Some(lower), Some(upper), 2) = (continuation, plain, group.len()) else {
            if group.len() == 2 {
                debug!(
                    label = %group[0].label.text,
                    "two fragments without a continuation half"
                );
            }
            outcome.records.append(&mut group);
            continue;
        };

        match stitch_pair(&group[upper], &group[lower]) {
            Ok(path) => {
                info!(path = %path.display(), "stitched split chart");
                outcome.stitched.push(path);
                outcome.records.push(group.swap_remove(upper));
            }
            Err(e) => {
                warn!(label = %group[upper].label.text, error = %e, "stitch failed");
                warnings.push(
                    ExtractWarning::with_code(ExtractWarningCode::StitchFailed, e.to_string())
                        .on_page(group[lower].page)
                        .for_element(group[upper].label.text.clone()),
                );
                outcome.records.append(&mut group);
            }
        }
    }

    ExtractResult::with_warnings(outcome, warnings)
}
