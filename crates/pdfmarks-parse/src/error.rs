//! Error types for the PDF backend layer.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Provides [`BackendError`]
//! that wraps backend-specific errors and converts them to [`BookmarkError`].

use pdfmarks_core::BookmarkError;
use thiserror::Error;

/// Error type for PDF backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Error from PDF parsing or writing (structure, syntax, object resolution).
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading or writing PDF data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] BookmarkError),
}

impl From<BackendError> for BookmarkError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => BookmarkError::Pdf(msg),
            BackendError::Io(e) => BookmarkError::Io(e.to_string()),
            BackendError::Core(e) => e,
        }
    }
}
