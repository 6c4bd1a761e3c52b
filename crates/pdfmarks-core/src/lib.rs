//! pdfmarks-core: Backend-independent bookmark types and conversions.
//!
//! This crate provides the outline tree ([`Outline`]), the flat record
//! ([`Bookmark`]), the zoom/destination mapping, and both directions of the
//! pdftk bookmark text conversion. It knows nothing about PDF files; the
//! `pdfmarks-parse` crate reads and writes outlines in real documents.

pub mod bookmark;
pub mod destination;
pub mod error;
pub mod flatten;
pub mod format;
pub mod outline;
pub mod parser;
pub mod rebuild;
pub mod zoom;

pub use bookmark::{Bookmark, ZoomType};
pub use destination::{Destination, DestinationKind};
pub use error::{BookmarkError, ExportOptions, ExportResult, ExportWarning, WarningCode};
pub use flatten::{flatten, to_text, write_bookmarks};
pub use outline::{ItemId, Outline, OutlineItem};
pub use parser::{RecordBuilder, parse_bookmarks, parse_bookmarks_str};
pub use rebuild::build_outline;
pub use zoom::{ZoomView, from_destination, identify_zoom_type, to_destination};
