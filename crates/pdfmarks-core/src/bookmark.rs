//! Flat bookmark records.
//!
//! A [`Bookmark`] is one `BookmarkBegin` block of the pdftk text format: a
//! title, a 1-based nesting level, and an optional page target with its view
//! instruction. The tree form lives in [`crate::outline`].

use std::fmt;

use crate::zoom::identify_zoom_type;

/// View instruction applied when a bookmark's destination is opened.
///
/// "Unset" is represented as `Option::<ZoomType>::None` throughout the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZoomType {
    /// Keep whatever zoom the viewer currently uses.
    Inherit,
    /// Fit the whole page in the window.
    FitPage,
    /// Fit the page width in the window.
    FitWidth,
    /// Fit the page height in the window.
    FitHeight,
    /// An explicit magnification, written as e.g. `150%`.
    ZoomPercent,
}

impl ZoomType {
    /// Every zoom type, in declaration order.
    pub const ALL: [ZoomType; 5] = [
        ZoomType::Inherit,
        ZoomType::FitPage,
        ZoomType::FitWidth,
        ZoomType::FitHeight,
        ZoomType::ZoomPercent,
    ];

    /// The canonical name used in `BookmarkZoom` lines.
    pub fn name(self) -> &'static str {
        match self {
            ZoomType::Inherit => "Inherit",
            ZoomType::FitPage => "FitPage",
            ZoomType::FitWidth => "FitWidth",
            ZoomType::FitHeight => "FitHeight",
            ZoomType::ZoomPercent => "ZoomPercent",
        }
    }
}

impl fmt::Display for ZoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single flattened bookmark.
///
/// Produced by [`crate::flatten`] on export and by [`crate::parser`] on
/// import. Page numbers are 1-based regardless of how the PDF stores them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bookmark {
    /// The bookmark title text.
    pub title: String,
    /// Nesting depth, starting at 1 for top-level bookmarks.
    pub level: usize,
    /// The 1-based destination page, or `None` for non-navigation bookmarks.
    pub page_number: Option<usize>,
    /// Vertical scroll position on the destination page (0 = absent).
    pub y_offset: u32,
    /// Parsed view instruction, `None` when unset or unrecognized.
    pub zoom_type: Option<ZoomType>,
    /// The literal zoom text, e.g. `"150%"` or `"FitWidth"`.
    pub zoom: Option<String>,
}

impl Bookmark {
    /// Create a bookmark from imported field values.
    ///
    /// The zoom type is derived from the raw zoom text; an unrecognized zoom
    /// keeps its raw text but leaves `zoom_type` unset.
    pub fn new(
        title: impl Into<String>,
        level: usize,
        page_number: Option<usize>,
        y_offset: u32,
        zoom: Option<String>,
    ) -> Self {
        let zoom_type = zoom.as_deref().and_then(identify_zoom_type);
        Self {
            title: title.into(),
            level,
            page_number,
            y_offset,
            zoom_type,
            zoom,
        }
    }
}

impl fmt::Display for Bookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let page = match self.page_number {
            Some(page) => page.to_string(),
            None => "-".to_string(),
        };
        write!(
            f,
            "Bookmark to page {page} @ {} / {} - {}",
            self.level,
            self.zoom.as_deref().unwrap_or("-"),
            self.title
        )
    }
}
