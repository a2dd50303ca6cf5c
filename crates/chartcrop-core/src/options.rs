//! Extraction settings.

use crate::label::LabelPatterns;
use crate::placement::DEFAULT_MARGIN;

/// Default page rendering magnification.
pub const DEFAULT_ZOOM: f32 = 2.0;

/// Options controlling rendering, label detection and cropping.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Page rendering magnification (default: 2.0). Higher values give
    /// sharper crops at the cost of larger page images.
    pub zoom: f32,
    /// Margin added around each crop, in page units (default: 10.0).
    pub margin: f64,
    /// Caption and footnote patterns (default: [`LabelPatterns::default`]).
    pub patterns: LabelPatterns,
    /// Whether rendered page images are kept after cropping (default: true).
    pub keep_page_images: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            margin: DEFAULT_MARGIN,
            patterns: LabelPatterns::default(),
            keep_page_images: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{DEFAULT_CAPTION_PATTERN, DEFAULT_FOOTNOTE_PATTERN};

    #[test]
    fn defaults() {
        let opts = ExtractOptions::default();
        assert_eq!(opts.zoom, 2.0);
        assert_eq!(opts.margin, 10.0);
        assert!(opts.keep_page_images);
        assert_eq!(opts.patterns.caption_pattern(), DEFAULT_CAPTION_PATTERN);
        assert_eq!(opts.patterns.footnote_pattern(), DEFAULT_FOOTNOTE_PATTERN);
    }
}
