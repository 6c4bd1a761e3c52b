//! Error and warning types for pdfmarks.
//!
//! Provides [`BookmarkError`] for fatal errors that stop a conversion,
//! [`ExportWarning`] for non-fatal issues that allow best-effort export,
//! [`ExportResult`] for pairing a value with collected warnings, and
//! [`ExportOptions`] for configuring traversal limits and warning behavior.

use std::fmt;

use thiserror::Error;

/// Fatal error types for bookmark conversion.
///
/// Import errors are all-or-nothing: when any of these is returned from an
/// import, the target document has not been modified.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BookmarkError {
    /// Malformed bookmark text, such as a non-numeric `BookmarkLevel`.
    #[error("format error on line {line}: {message}")]
    Format {
        /// 1-based line number of the offending input line.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },
    /// The record list cannot be turned into an outline tree.
    #[error("structural error: {0}")]
    Structural(String),
    /// A destination kind outside the four supported fit/zoom kinds.
    #[error("unsupported destination: {0}")]
    UnsupportedDestination(String),
    /// I/O error reading or writing a document or bookmark file.
    #[error("I/O error: {0}")]
    Io(String),
    /// The PDF container could not be parsed or written.
    #[error("PDF error: {0}")]
    Pdf(String),
    /// The PDF is encrypted and requires a password to open.
    #[error("PDF is encrypted and requires a password")]
    PasswordRequired,
    /// The supplied password is incorrect for this encrypted PDF.
    #[error("the supplied password is incorrect")]
    InvalidPassword,
}

impl From<std::io::Error> for BookmarkError {
    fn from(err: std::io::Error) -> Self {
        BookmarkError::Io(err.to_string())
    }
}

/// Machine-readable warning code for categorizing export issues.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "detail")
)]
pub enum WarningCode {
    /// The bookmark targets a destination kind that has no zoom name.
    UnsupportedDestination,
    /// The bookmark carries a non-navigation action (URI, JavaScript, ...).
    NonNavigation,
    /// The outline nests deeper than [`ExportOptions::max_depth`].
    DepthLimit,
    /// A destination page is outside the document's page range.
    PageOutOfRange,
    /// Any other warning not covered by specific variants.
    Other(String),
}

impl WarningCode {
    /// Returns the string tag for this warning code.
    pub fn as_str(&self) -> &str {
        match self {
            WarningCode::UnsupportedDestination => "UNSUPPORTED_DESTINATION",
            WarningCode::NonNavigation => "NON_NAVIGATION",
            WarningCode::DepthLimit => "DEPTH_LIMIT",
            WarningCode::PageOutOfRange => "PAGE_OUT_OF_RANGE",
            WarningCode::Other(_) => "OTHER",
        }
    }
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal warning encountered while exporting bookmarks.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExportWarning {
    /// Machine-readable warning code.
    pub code: WarningCode,
    /// Human-readable description of the warning.
    pub description: String,
    /// Title of the bookmark the warning is about, if any.
    pub title: Option<String>,
    /// Outline level of that bookmark (1 = top level), if known.
    pub level: Option<usize>,
}

impl ExportWarning {
    /// Create a warning with just a description.
    ///
    /// Uses [`WarningCode::Other`] as the code.
    pub fn new(description: impl Into<String>) -> Self {
        let desc = description.into();
        Self {
            code: WarningCode::Other(desc.clone()),
            description: desc,
            title: None,
            level: None,
        }
    }

    /// Create a warning with a specific code and description.
    pub fn with_code(code: WarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            title: None,
            level: None,
        }
    }

    /// Attach the bookmark this warning is about (builder pattern).
    pub fn for_bookmark(mut self, title: impl Into<String>, level: usize) -> Self {
        self.title = Some(title.into());
        self.level = Some(level);
        self
    }

    /// Convert this warning into a [`BookmarkError`].
    ///
    /// Used by strict mode to escalate warnings to errors.
    pub fn to_error(&self) -> BookmarkError {
        match self.code {
            WarningCode::UnsupportedDestination => {
                BookmarkError::UnsupportedDestination(self.description.clone())
            }
            _ => BookmarkError::Structural(self.to_string()),
        }
    }
}

impl fmt::Display for ExportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(ref title) = self.title {
            write!(f, " (bookmark {title:?}")?;
            if let Some(level) = self.level {
                write!(f, " at level {level}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Result wrapper that pairs a value with collected warnings.
///
/// Used when an export can partially succeed with non-fatal issues.
#[derive(Debug, Clone)]
pub struct ExportResult<T> {
    /// The exported value.
    pub value: T,
    /// Warnings collected during export.
    pub warnings: Vec<ExportWarning>,
}

impl<T> ExportResult<T> {
    /// Create a result with no warnings.
    pub fn ok(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Create a result with warnings.
    pub fn with_warnings(value: T, warnings: Vec<ExportWarning>) -> Self {
        Self { value, warnings }
    }

    /// Returns true if there are no warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Transform the value while preserving warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ExportResult<U> {
        ExportResult {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}

/// Options controlling outline traversal and warning behavior.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Deepest outline level exported (default: `None`, unlimited).
    ///
    /// Deeper items are skipped with a single `DepthLimit` warning.
    pub max_depth: Option<usize>,
    /// Whether to collect warnings during export (default: true).
    pub collect_warnings: bool,
    /// When true, any warning is escalated to an error (default: false).
    pub strict_mode: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            collect_warnings: true,
            strict_mode: false,
        }
    }
}

impl ExportOptions {
    /// Record `warning` according to these options.
    ///
    /// Returns the escalated error in strict mode; otherwise pushes the
    /// warning (when collecting) and returns `Ok`.
    pub fn record(
        &self,
        warnings: &mut Vec<ExportWarning>,
        warning: ExportWarning,
    ) -> Result<(), BookmarkError> {
        if self.strict_mode {
            return Err(warning.to_error());
        }
        if self.collect_warnings {
            warnings.push(warning);
        }
        Ok(())
    }
}
