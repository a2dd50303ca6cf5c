//! Error and warning types for chartcrop.
//!
//! Provides [`ChartError`] for fatal errors that stop a run before or during
//! page processing, [`ExtractWarning`] for per-region problems that allow
//! best-effort continuation, and [`ExtractResult`] for pairing a value with
//! the warnings collected while producing it.

use std::fmt;

/// Fatal error types for chart extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartError {
    /// I/O error reading the document or writing output.
    IoError(String),
    /// The document could not be opened or parsed by the backend.
    BackendError(String),
    /// The document is encrypted and requires a password to open.
    PasswordRequired,
    /// The supplied password is incorrect for this encrypted document.
    InvalidPassword,
    /// The document forbids text extraction.
    ExtractionNotAllowed,
    /// Pages were fed to the page window out of order.
    PageOrder {
        /// Index of the page already held by the window.
        previous: usize,
        /// Index of the page that was pushed after it.
        current: usize,
    },
    /// A caption or footnote pattern failed to compile.
    InvalidPattern(String),
    /// Any other error not covered by specific variants.
    Other(String),
}

impl fmt::Display for ChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartError::IoError(msg) => write!(f, "I/O error: {msg}"),
            ChartError::BackendError(msg) => write!(f, "backend error: {msg}"),
            ChartError::PasswordRequired => {
                write!(f, "document is encrypted and requires a password")
            }
            ChartError::InvalidPassword => write!(f, "the supplied password is incorrect"),
            ChartError::ExtractionNotAllowed => {
                write!(f, "text extraction is not allowed for this document")
            }
            ChartError::PageOrder { previous, current } => write!(
                f,
                "pages must be scanned in increasing order (page {current} after page {previous})"
            ),
            ChartError::InvalidPattern(msg) => write!(f, "invalid label pattern: {msg}"),
            ChartError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ChartError {}

impl From<std::io::Error> for ChartError {
    fn from(err: std::io::Error) -> Self {
        ChartError::IoError(err.to_string())
    }
}

impl From<regex::Error> for ChartError {
    fn from(err: regex::Error) -> Self {
        ChartError::InvalidPattern(err.to_string())
    }
}

/// Machine-readable warning code for categorizing extraction issues.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "detail")
)]
pub enum ExtractWarningCode {
    /// A page could not be rendered; its regions were skipped.
    RenderFailed,
    /// A single region could not be cropped or saved.
    CropFailed,
    /// A crop file name was produced twice and the later crop replaced the earlier one.
    OverwrittenCrop,
    /// Two halves of a split chart could not be stitched.
    StitchFailed,
    /// More than two fragments share one label; no merge order is defined.
    AmbiguousContinuation,
    /// Any other warning not covered by specific variants.
    Other(String),
}

impl ExtractWarningCode {
    /// Returns the string tag for this warning code.
    pub fn as_str(&self) -> &str {
        match self {
            ExtractWarningCode::RenderFailed => "RENDER_FAILED",
            ExtractWarningCode::CropFailed => "CROP_FAILED",
            ExtractWarningCode::OverwrittenCrop => "OVERWRITTEN_CROP",
            ExtractWarningCode::StitchFailed => "STITCH_FAILED",
            ExtractWarningCode::AmbiguousContinuation => "AMBIGUOUS_CONTINUATION",
            ExtractWarningCode::Other(_) => "OTHER",
        }
    }
}

impl fmt::Display for ExtractWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal problem encountered during extraction.
///
/// Carries a structured [`code`](ExtractWarning::code), a human-readable
/// description, and optionally the page and the chart label involved.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractWarning {
    /// Machine-readable warning code.
    pub code: ExtractWarningCode,
    /// Human-readable description of the warning.
    pub description: String,
    /// Page number where the warning occurred (0-indexed), if applicable.
    pub page: Option<usize>,
    /// Chart label the warning refers to, if applicable.
    pub element: Option<String>,
}

impl ExtractWarning {
    /// Create a warning with just a description.
    ///
    /// Uses [`ExtractWarningCode::Other`] as the default code.
    pub fn new(description: impl Into<String>) -> Self {
        let desc = description.into();
        Self {
            code: ExtractWarningCode::Other(desc.clone()),
            description: desc,
            page: None,
            element: None,
        }
    }

    /// Create a warning with a specific code and description.
    pub fn with_code(code: ExtractWarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            page: None,
            element: None,
        }
    }

    /// Attach the page the warning was raised on.
    pub fn on_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    /// Attach the chart label the warning refers to.
    pub fn for_element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }
}

impl fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(page) = self.page {
            write!(f, " (page {page})")?;
        }
        if let Some(ref element) = self.element {
            write!(f, " [{element}]")?;
        }
        Ok(())
    }
}

/// Result wrapper that pairs a value with collected warnings.
#[derive(Debug, Clone)]
pub struct ExtractResult<T> {
    /// The extracted value.
    pub value: T,
    /// Warnings collected during extraction.
    pub warnings: Vec<ExtractWarning>,
}

impl<T> ExtractResult<T> {
    /// Create a result with no warnings.
    pub fn ok(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Create a result with warnings.
    pub fn with_warnings(value: T, warnings: Vec<ExtractWarning>) -> Self {
        Self { value, warnings }
    }

    /// Returns true if there are no warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
