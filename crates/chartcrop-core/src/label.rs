//! Caption and footnote labels and the patterns that recognize them.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ChartError;
use crate::geometry::BBox;

/// Default caption pattern: a chart numbering keyword, digits, and an
/// optional separator ("图 3：", "表12", "Figure 3:", "Table 4.").
pub const DEFAULT_CAPTION_PATTERN: &str =
    r"(?:[图表]+|\b(?i:figure|fig\.?|table|chart|exhibit))\s*\d+[:：.\s]*";

/// Default footnote pattern: a localized "source:" keyword.
pub const DEFAULT_FOOTNOTE_PATTERN: &str = r"(?:来源|\b(?i:sources?))[:：\s]";

/// Text attached to a caption or footnote box.
///
/// `is_continuation` marks a caption synthesized for the lower half of a
/// chart that started on the previous page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Label {
    pub text: String,
    pub is_continuation: bool,
}

impl Label {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_continuation: false,
        }
    }

    pub fn continuation(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_continuation: true,
        }
    }
}

/// A text element's box paired with its stored label.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabeledBox {
    pub bbox: BBox,
    pub label: Label,
}

impl LabeledBox {
    pub fn new(bbox: BBox, label: Label) -> Self {
        Self { bbox, label }
    }

    /// Box with a plain (non-continuation) label.
    pub fn plain(bbox: BBox, text: impl Into<String>) -> Self {
        Self::new(bbox, Label::plain(text))
    }

    /// Zero-area, empty-text box used to close a caption whose chart runs
    /// off the bottom of its page.
    pub fn page_bottom() -> Self {
        Self::plain(BBox::zero(), "")
    }
}

/// How a text element was classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Caption text, starting at the numbering keyword, newlines removed.
    Caption(String),
    /// Footnote text, truncated to its first line.
    Footnote(String),
}

/// Compiled caption and footnote patterns.
#[derive(Debug, Clone)]
pub struct LabelPatterns {
    caption: Regex,
    footnote: Regex,
}

impl LabelPatterns {
    /// Compile a pattern pair.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::InvalidPattern`] if either pattern does not compile.
    pub fn new(caption: &str, footnote: &str) -> Result<Self, ChartError> {
        Ok(Self {
            caption: Regex::new(caption)?,
            footnote: Regex::new(footnote)?,
        })
    }

    pub fn caption_pattern(&self) -> &str {
        self.caption.as_str()
    }

    pub fn footnote_pattern(&self) -> &str {
        self.footnote.as_str()
    }

    /// Classify already-trimmed element text. A caption match takes priority.
    pub fn classify(&self, text: &str) -> Option<Classification> {
        if let Some(m) = self.caption.find(text) {
            let caption: String = text[m.start()..]
                .chars()
                .filter(|c| *c != '\n' && *c != '\r')
                .collect();
            return Some(Classification::Caption(caption));
        }
        if self.footnote.is_match(text) {
            let first_line = text.lines().next().unwrap_or_default();
            return Some(Classification::Footnote(first_line.to_string()));
        }
        None
    }
}

// compiled once; both constants are exercised by the tests below
static DEFAULT_PATTERNS: LazyLock<LabelPatterns> = LazyLock::new(|| LabelPatterns {
    caption: Regex::new(DEFAULT_CAPTION_PATTERN).expect("default caption pattern"),
    footnote: Regex::new(DEFAULT_FOOTNOTE_PATTERN).expect("default footnote pattern"),
});

impl Default for LabelPatterns {
    fn default() -> Self {
        DEFAULT_PATTERNS.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> Option<Classification> {
        LabelPatterns::default().classify(text)
    }

    #[test]
    fn chinese_caption_starts_at_keyword() {
        assert_eq!(
            classify("公司概况 图 3：营业收入\n及增速"),
            Some(Classification::Caption("图 3：营业收入及增速".to_string()))
        );
    }

    #[test]
    fn english_caption_variants() {
        assert_eq!(
            classify("Fig 1: Sample"),
            Some(Classification::Caption("Fig 1: Sample".to_string()))
        );
        assert_eq!(
            classify("Figure 12. Revenue mix"),
            Some(Classification::Caption("Figure 12. Revenue mix".to_string()))
        );
        assert_eq!(
            classify("TABLE 4 Cash flow"),
            Some(Classification::Caption("TABLE 4 Cash flow".to_string()))
        );
    }

    #[test]
    fn keyword_without_number_is_not_caption() {
        assert_eq!(classify("Table of contents"), None);
        assert_eq!(classify("图表目录"), None);
    }

    #[test]
    fn footnote_truncated_to_first_line() {
        assert_eq!(
            classify("资料来源：公司财报，安信证券研究中心\n请务必阅读正文之后的免责条款"),
            Some(Classification::Footnote(
                "资料来源：公司财报，安信证券研究中心".to_string()
            ))
        );
        assert_eq!(
            classify("Source: Test"),
            Some(Classification::Footnote("Source: Test".to_string()))
        );
    }

    #[test]
    fn source_inside_a_word_is_ignored() {
        assert_eq!(classify("Human resources: headcount"), None);
        assert_eq!(classify("Resource: none"), None);
    }

    #[test]
    fn caption_wins_over_footnote() {
        assert_eq!(
            classify("Source: see Table 2 below"),
            Some(Classification::Caption("Table 2 below".to_string()))
        );
    }

    #[test]
    fn custom_patterns() {
        let patterns = LabelPatterns::new(r"Abb\.\s*\d+", r"Quelle:").unwrap();
        assert_eq!(
            patterns.classify("Abb. 7 Umsatz"),
            Some(Classification::Caption("Abb. 7 Umsatz".to_string()))
        );
        assert_eq!(
            patterns.classify("Quelle: Bundesbank"),
            Some(Classification::Footnote("Quelle: Bundesbank".to_string()))
        );
        assert_eq!(patterns.caption_pattern(), r"Abb\.\s*\d+");
    }

    #[test]
    fn default_patterns_compile() {
        assert!(LabelPatterns::new(DEFAULT_CAPTION_PATTERN, DEFAULT_FOOTNOTE_PATTERN).is_ok());
        assert_eq!(LabelPatterns::default().caption_pattern(), DEFAULT_CAPTION_PATTERN);
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = LabelPatterns::new("[unclosed", DEFAULT_FOOTNOTE_PATTERN).unwrap_err();
        assert!(matches!(err, ChartError::InvalidPattern(_)));
    }

    #[test]
    fn label_constructors() {
        assert!(!Label::plain("a").is_continuation);
        assert!(Label::continuation("a").is_continuation);
        let bottom = LabeledBox::page_bottom();
        assert_eq!(bottom.bbox, BBox::zero());
        assert!(bottom.label.text.is_empty());
    }
}
