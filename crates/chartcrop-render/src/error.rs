//! Error types for the document backends.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Provides [`BackendError`]
//! that wraps backend-specific errors and converts them to [`ChartError`].

use chartcrop_core::ChartError;
use thiserror::Error;

/// Error type for document backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The document could not be opened or parsed.
    #[error("document error: {0}")]
    Document(String),

    /// The document is encrypted and no password was given.
    #[error("document is encrypted and requires a password")]
    PasswordRequired,

    /// The given password does not open the document.
    #[error("the supplied password is incorrect")]
    InvalidPassword,

    /// The document's permissions forbid text extraction.
    #[error("text extraction is not allowed for this document")]
    ExtractionNotAllowed,

    /// A page index past the end of the document.
    #[error("page {index} out of range (document has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },

    /// The page could not be rendered to a bitmap.
    #[error("render error on page {page}: {message}")]
    Render { page: usize, message: String },

    /// Error encoding a rendered page.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Error reading the document or writing a page image.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] ChartError),
}

impl From<BackendError> for ChartError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::PasswordRequired => ChartError::PasswordRequired,
            BackendError::InvalidPassword => ChartError::InvalidPassword,
            BackendError::ExtractionNotAllowed => ChartError::ExtractionNotAllowed,
            BackendError::Io(e) => ChartError::IoError(e.to_string()),
            BackendError::Core(e) => e,
            other => ChartError::BackendError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_document() {
        let err = BackendError::Document("bad xref".to_string());
        assert_eq!(err.to_string(), "document error: bad xref");
    }

    #[test]
    fn backend_error_io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: BackendError = io_err.into();
        assert!(matches!(err, BackendError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn password_errors_keep_their_kind() {
        assert_eq!(
            ChartError::from(BackendError::PasswordRequired),
            ChartError::PasswordRequired
        );
        assert_eq!(
            ChartError::from(BackendError::InvalidPassword),
            ChartError::InvalidPassword
        );
        assert_eq!(
            ChartError::from(BackendError::ExtractionNotAllowed),
            ChartError::ExtractionNotAllowed
        );
    }

    #[test]
    fn render_error_becomes_backend_error() {
        let err = BackendError::Render {
            page: 3,
            message: "bitmap allocation failed".to_string(),
        };
        assert_eq!(
            ChartError::from(err),
            ChartError::BackendError("render error on page 3: bitmap allocation failed".to_string())
        );
    }

    #[test]
    fn page_out_of_range_message() {
        let err = BackendError::PageOutOfRange { index: 7, count: 5 };
        assert_eq!(err.to_string(), "page 7 out of range (document has 5 pages)");
    }

    #[test]
    fn core_error_round_trips() {
        let core = ChartError::InvalidPattern("unclosed group".to_string());
        let err: BackendError = core.clone().into();
        assert!(matches!(err, BackendError::Core(_)));
        assert_eq!(ChartError::from(err), core);
    }
}
