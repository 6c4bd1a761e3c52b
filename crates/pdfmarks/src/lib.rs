//! pdfmarks: Export and import PDF bookmarks as pdftk-compatible text.
//!
//! This is the public API facade crate for pdfmarks. It re-exports types from
//! pdfmarks-core and uses pdfmarks-parse for reading and writing documents.
//!
//! # Architecture
//!
//! - **pdfmarks-core**: Outline tree, bookmark records, zoom mapping and the
//!   text format, independent of any PDF library
//! - **pdfmarks-parse**: The [`OutlineBackend`] trait and its lopdf implementation
//! - **pdfmarks** (this crate): [`export`] / [`import`] over any backend and the
//!   [`Bookmarks`] document handle
//!
//! # Example
//!
//! ```ignore
//! let mut doc = Bookmarks::open_file("report.pdf")?;
//! let text = doc.export()?.value;
//! let edited = text.replace("Chapter", "Part");
//! doc.import(&edited)?;
//! doc.save_file("report-edited.pdf")?;
//! ```

mod bookmarks;

use std::io::BufRead;

pub use bookmarks::Bookmarks;
pub use pdfmarks_core;
pub use pdfmarks_core::{
    Bookmark, BookmarkError, Destination, DestinationKind, ExportOptions, ExportResult,
    ExportWarning, ItemId, Outline, OutlineItem, WarningCode, ZoomType, build_outline, flatten,
    parse_bookmarks, parse_bookmarks_str, to_text, write_bookmarks,
};
pub use pdfmarks_parse;
pub use pdfmarks_parse::{BackendError, LopdfBackend, LopdfDocument, OutlineBackend};

/// Read the outline of `doc` as bookmark records.
///
/// The value is `None` when the document has no outline at all, and an empty
/// list when it has an outline without items.
///
/// # Errors
///
/// Returns a backend error if the outline cannot be read, or the first
/// warning when `options.strict_mode` is set.
pub fn export_records<B: OutlineBackend>(
    doc: &B::Document,
    options: &ExportOptions,
) -> Result<ExportResult<Option<Vec<Bookmark>>>, BookmarkError> {
    match B::outline(doc).map_err(Into::into)? {
        Some(outline) => Ok(flatten(&outline, options)?.map(Some)),
        None => {
            tracing::debug!("document has no outline");
            Ok(ExportResult::ok(None))
        }
    }
}

/// Export the outline of `doc` as bookmark text.
///
/// A missing outline and an empty one both give empty text.
///
/// # Errors
///
/// See [`export_records`].
pub fn export<B: OutlineBackend>(
    doc: &B::Document,
    options: &ExportOptions,
) -> Result<ExportResult<String>, BookmarkError> {
    Ok(export_records::<B>(doc, options)?
        .map(|records| records.map(|records| to_text(&records)).unwrap_or_default()))
}

/// Replace the outline of `doc` with the bookmarks in `text`.
///
/// Returns the number of bookmarks written. The text is parsed and the tree
/// built before the document is touched, so on error `doc` is unchanged.
///
/// # Errors
///
/// [`BookmarkError::Format`] for malformed text, [`BookmarkError::Structural`]
/// when no usable records remain or the first is not at level 1, or a
/// backend error from writing the outline.
pub fn import<B: OutlineBackend>(doc: &mut B::Document, text: &str) -> Result<usize, BookmarkError> {
    import_from::<B, _>(doc, text.as_bytes())
}

/// Like [`import`], reading the bookmark text from `reader`.
pub fn import_from<B: OutlineBackend, R: BufRead>(
    doc: &mut B::Document,
    reader: R,
) -> Result<usize, BookmarkError> {
    let records = parse_bookmarks(reader)?;
    import_records::<B>(doc, &records)
}

/// Replace the outline of `doc` with an outline built from `records`.
pub fn import_records<B: OutlineBackend>(
    doc: &mut B::Document,
    records: &[Bookmark],
) -> Result<usize, BookmarkError> {
    let outline = build_outline(records)?;
    B::set_outline(doc, &outline).map_err(Into::into)?;
    tracing::debug!(count = outline.len(), "imported bookmarks");
    Ok(outline.len())
}
