//! chartcrop-core: Backend-independent chart location from caption and
//! footnote geometry.
//!
//! This crate provides the page-space types ([`BBox`], [`LabeledBox`],
//! [`PageLayout`], [`ChartRegion`]) and the algorithms that turn a document's
//! text layout into crop rectangles: label classification, cross-page
//! continuation, level grouping and horizontal placement. It performs no I/O;
//! parsing, rendering and bitmap work live in the backend and facade crates.

pub mod continuation;
pub mod error;
pub mod geometry;
pub mod label;
pub mod levels;
pub mod options;
pub mod placement;
pub mod region;
pub mod scan;
pub mod window;

pub use continuation::{Resolution, resolve_orphan_footnote};
pub use error::{ChartError, ExtractResult, ExtractWarning, ExtractWarningCode};
pub use geometry::{BBox, PageSize};
pub use label::{
    Classification, DEFAULT_CAPTION_PATTERN, DEFAULT_FOOTNOTE_PATTERN, Label, LabelPatterns,
    LabeledBox,
};
pub use levels::{Level, group_levels, same_level};
pub use options::{DEFAULT_ZOOM, ExtractOptions};
pub use placement::{
    CropPlacement, DEFAULT_MARGIN, PagePlan, PixelRect, place_regions, plan_page,
};
pub use region::{ChartRegion, pair_regions};
pub use scan::{LayoutElement, PageLayout, scan_page};
pub use window::{PageInput, PageWindow};
