//! PDF document service trait.
//!
//! Defines the [`OutlineBackend`] trait that abstracts reading and replacing
//! a document's outline. The conversion code in `pdfmarks` only talks to
//! this trait; [`crate::LopdfBackend`] is the implementation used for real
//! files.

use pdfmarks_core::{BookmarkError, Outline};

/// Trait abstracting the PDF operations bookmark conversion needs.
///
/// # Associated Types
///
/// - `Document`: The parsed PDF document representation.
/// - `Error`: Backend-specific error type, convertible to [`BookmarkError`].
///
/// # Usage
///
/// ```ignore
/// let mut doc = MyBackend::open(pdf_bytes)?;
/// let outline = MyBackend::outline(&doc)?;
/// MyBackend::set_outline(&mut doc, &new_outline)?;
/// let bytes = MyBackend::save(&mut doc)?;
/// ```
pub trait OutlineBackend {
    /// The parsed PDF document type.
    type Document;

    /// Backend-specific error type, convertible to [`BookmarkError`].
    type Error: std::error::Error + Into<BookmarkError>;

    /// Parse PDF bytes into a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes do not represent a valid PDF document,
    /// or if the document is encrypted.
    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error>;

    /// Parse an encrypted PDF, decrypting it with `password`.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a PDF or the password is wrong.
    fn open_with_password(bytes: &[u8], password: &[u8]) -> Result<Self::Document, Self::Error>;

    /// Return the number of pages in the document.
    fn page_count(doc: &Self::Document) -> usize;

    /// Read the document outline.
    ///
    /// Returns `None` when the catalog has no outline at all, and an empty
    /// [`Outline`] when the outline exists but has no items. Every item's
    /// destination is already resolved, from either a direct destination or
    /// a go-to action; other action kinds leave it `None`. The whole tree is
    /// read regardless of depth.
    ///
    /// # Errors
    ///
    /// Returns an error if the outline cannot be read.
    fn outline(doc: &Self::Document) -> Result<Option<Outline>, Self::Error>;

    /// Replace the document outline with `outline`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be updated.
    fn set_outline(doc: &mut Self::Document, outline: &Outline) -> Result<(), Self::Error>;

    /// Serialize the document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    fn save(doc: &mut Self::Document) -> Result<Vec<u8>, Self::Error>;
}
