//! Document handle for bookmark export and import.

use std::io::{BufRead, Write};

use pdfmarks_core::{Bookmark, BookmarkError, ExportOptions, ExportResult, ExportWarning};
use pdfmarks_parse::{LopdfBackend, LopdfDocument, OutlineBackend};

/// An open PDF whose bookmarks can be exported, replaced and saved.
///
/// Wraps a [`LopdfDocument`]. Nothing is written anywhere until
/// [`save_to`](Bookmarks::save_to), [`save_file`](Bookmarks::save_file) or
/// [`to_bytes`](Bookmarks::to_bytes) is called.
///
/// ```ignore
/// let doc = Bookmarks::open(&bytes)?;
/// print!("{}", doc.export()?.value);
/// ```
pub struct Bookmarks {
    doc: LopdfDocument,
}

impl Bookmarks {
    /// Open a PDF document from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BookmarkError::PasswordRequired`] if the PDF is encrypted,
    /// or [`BookmarkError::Pdf`] if the bytes are not a valid PDF document.
    pub fn open(bytes: &[u8]) -> Result<Self, BookmarkError> {
        let doc = LopdfBackend::open(bytes)?;
        Ok(Self { doc })
    }

    /// Open a PDF document from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`BookmarkError::Io`] if the file cannot be read, otherwise as
    /// [`Bookmarks::open`].
    #[cfg(feature = "std")]
    pub fn open_file(path: impl AsRef<std::path::Path>) -> Result<Self, BookmarkError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::open(&bytes)
    }

    /// Open an encrypted PDF document from bytes with a password.
    ///
    /// If the PDF is not encrypted, the password is ignored. A decrypted
    /// document is saved without encryption.
    ///
    /// # Errors
    ///
    /// Returns [`BookmarkError::InvalidPassword`] if the password is incorrect.
    pub fn open_with_password(bytes: &[u8], password: &[u8]) -> Result<Self, BookmarkError> {
        let doc = LopdfBackend::open_with_password(bytes, password)?;
        Ok(Self { doc })
    }

    /// Open an encrypted PDF document from a file path with a password.
    #[cfg(feature = "std")]
    pub fn open_file_with_password(
        path: impl AsRef<std::path::Path>,
        password: &[u8],
    ) -> Result<Self, BookmarkError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::open_with_password(&bytes, password)
    }

    /// Return the number of pages in the document.
    pub fn page_count(&self) -> usize {
        LopdfBackend::page_count(&self.doc)
    }

    /// Access the underlying document.
    pub fn document(&self) -> &LopdfDocument {
        &self.doc
    }

    /// Export the outline as bookmark text with default options.
    pub fn export(&self) -> Result<ExportResult<String>, BookmarkError> {
        self.export_with(&ExportOptions::default())
    }

    /// Export the outline as bookmark text.
    ///
    /// # Errors
    ///
    /// In strict mode, the first warning is returned as an error.
    pub fn export_with(&self, options: &ExportOptions) -> Result<ExportResult<String>, BookmarkError> {
        crate::export::<LopdfBackend>(&self.doc, options)
    }

    /// Write the bookmark text to `writer`, returning the export warnings.
    pub fn export_to<W: Write>(&self, writer: &mut W) -> Result<Vec<ExportWarning>, BookmarkError> {
        let result = self.records()?;
        pdfmarks_core::write_bookmarks(result.value.as_deref().unwrap_or_default(), writer)?;
        Ok(result.warnings)
    }

    /// Flattened bookmark records, with default options, or `None` when the
    /// document has no outline.
    pub fn records(&self) -> Result<ExportResult<Option<Vec<Bookmark>>>, BookmarkError> {
        crate::export_records::<LopdfBackend>(&self.doc, &ExportOptions::default())
    }

    /// Replace the outline with the bookmarks in `text`.
    ///
    /// Returns the number of bookmarks written. On error the outline is left
    /// as it was.
    pub fn import(&mut self, text: &str) -> Result<usize, BookmarkError> {
        crate::import::<LopdfBackend>(&mut self.doc, text)
    }

    /// Replace the outline with the bookmarks read from `reader`.
    pub fn import_from<R: BufRead>(&mut self, reader: R) -> Result<usize, BookmarkError> {
        crate::import_from::<LopdfBackend, R>(&mut self.doc, reader)
    }

    /// Import bookmarks from `reader` and write the updated PDF to `output`.
    ///
    /// Nothing is written to `output` when the import fails.
    pub fn import_bookmarks<R: BufRead, W: Write>(
        &mut self,
        reader: R,
        output: &mut W,
    ) -> Result<usize, BookmarkError> {
        let count = self.import_from(reader)?;
        self.save_to(output)?;
        Ok(count)
    }

    /// Serialize the document.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>, BookmarkError> {
        Ok(LopdfBackend::save(&mut self.doc)?)
    }

    /// Serialize the document into `writer`.
    pub fn save_to<W: Write>(&mut self, writer: &mut W) -> Result<(), BookmarkError> {
        let bytes = self.to_bytes()?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Serialize the document to the file at `path`.
    #[cfg(feature = "std")]
    pub fn save_file(&mut self, path: impl AsRef<std::path::Path>) -> Result<(), BookmarkError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), bytes)?;
        Ok(())
    }

    /// Release the document.
    pub fn close(self) {
        drop(self);
    }
}

impl std::fmt::Debug for Bookmarks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bookmarks").field("doc", &self.doc).finish()
    }
}
