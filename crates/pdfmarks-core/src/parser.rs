//! Bookmark text parser.
//!
//! Reads pdftk-style bookmark text line by line. Each `BookmarkBegin` line
//! (or the end of input) closes the record collected so far. Keys are matched
//! case-insensitively and unknown keys are ignored, so a complete
//! `dump_data` file with `InfoBegin` / `PageMedia` sections parses as well.
//!
//! Records without a title, a positive level, or a positive page number are
//! dropped. A malformed integer aborts the whole parse.

use std::io::BufRead;

use crate::bookmark::Bookmark;
use crate::error::BookmarkError;
use crate::format::{BOOKMARK_BEGIN, Key};

/// Fields of the record currently being read.
///
/// Every field starts absent; [`RecordBuilder::finish`] decides whether the
/// collected fields form a usable bookmark.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordBuilder {
    title: Option<String>,
    level: Option<i64>,
    page_number: Option<i64>,
    y_offset: Option<i64>,
    zoom: Option<String>,
}

impl RecordBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one `key: value` line. `line_no` is used for error messages.
    pub fn apply(&mut self, key: Key, value: &str, line_no: usize) -> Result<(), BookmarkError> {
        match key {
            Key::Title => self.title = Some(value.to_string()),
            Key::Level => self.level = Some(parse_int(key, value, line_no)?),
            Key::PageNumber => self.page_number = Some(parse_int(key, value, line_no)?),
            Key::YOffset => self.y_offset = Some(parse_int(key, value, line_no)?),
            Key::Zoom => self.zoom = Some(value.to_string()),
        }
        Ok(())
    }

    /// Returns true if no field has been set since the last reset.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Close the record, leaving the builder empty.
    ///
    /// Returns `None` when the record lacks a title, a positive level, or a
    /// positive page number.
    pub fn finish(&mut self) -> Option<Bookmark> {
        let record = std::mem::take(self);

        let title = record.title.filter(|title| !title.is_empty())?;
        let level = record.level.filter(|&level| level > 0)?;
        let page_number = record.page_number.filter(|&page| page > 0)?;
        let y_offset = record.y_offset.unwrap_or(0).clamp(0, i64::from(u32::MAX));
        let zoom = record.zoom.filter(|zoom| !zoom.is_empty());

        Some(Bookmark::new(
            title,
            usize::try_from(level).ok()?,
            Some(usize::try_from(page_number).ok()?),
            u32::try_from(y_offset).ok()?,
            zoom,
        ))
    }
}

fn parse_int(key: Key, value: &str, line_no: usize) -> Result<i64, BookmarkError> {
    value.parse::<i64>().map_err(|e| BookmarkError::Format {
        line: line_no,
        message: format!("invalid {} value {value:?}: {e}", key.as_str()),
    })
}

/// Parse bookmark text from a buffered reader.
///
/// # Errors
///
/// Returns [`BookmarkError::Format`] for a malformed `BookmarkLevel`,
/// `BookmarkPageNumber` or `BookmarkYOffset`, and [`BookmarkError::Io`] if
/// reading fails. No records are returned in either case.
pub fn parse_bookmarks<R: BufRead>(reader: R) -> Result<Vec<Bookmark>, BookmarkError> {
    let mut bookmarks = Vec::new();
    let mut builder = RecordBuilder::new();
    let mut dropped = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();

        if line.eq_ignore_ascii_case(BOOKMARK_BEGIN) {
            close_record(&mut builder, &mut bookmarks, &mut dropped);
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        if let Some(key) = Key::lookup(key) {
            builder.apply(key, value.trim(), index + 1)?;
        }
    }
    close_record(&mut builder, &mut bookmarks, &mut dropped);

    tracing::debug!(kept = bookmarks.len(), dropped, "parsed bookmark text");
    Ok(bookmarks)
}

fn close_record(builder: &mut RecordBuilder, bookmarks: &mut Vec<Bookmark>, dropped: &mut usize) {
    if builder.is_empty() {
        return;
    }
    match builder.finish() {
        Some(bookmark) => bookmarks.push(bookmark),
        None => *dropped += 1,
    }
}

/// Parse bookmark text held in memory.
pub fn parse_bookmarks_str(text: &str) -> Result<Vec<Bookmark>, BookmarkError> {
    parse_bookmarks(text.as_bytes())
}
