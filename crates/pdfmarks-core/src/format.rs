//! Keys of the pdftk bookmark text format.

/// Sentinel line that opens every bookmark record.
pub const BOOKMARK_BEGIN: &str = "BookmarkBegin";
/// Bookmark title key.
pub const BOOKMARK_TITLE: &str = "BookmarkTitle";
/// 1-based nesting level key.
pub const BOOKMARK_LEVEL: &str = "BookmarkLevel";
/// 1-based page number key.
pub const BOOKMARK_PAGE_NUMBER: &str = "BookmarkPageNumber";
/// Zoom / fit instruction key.
pub const BOOKMARK_ZOOM: &str = "BookmarkZoom";
/// Vertical offset key.
pub const BOOKMARK_Y_OFFSET: &str = "BookmarkYOffset";

/// A recognised record key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Title,
    Level,
    PageNumber,
    Zoom,
    YOffset,
}

impl Key {
    /// Match a key case-insensitively, ignoring surrounding whitespace.
    pub fn lookup(raw: &str) -> Option<Key> {
        let raw = raw.trim();
        [
            (BOOKMARK_TITLE, Key::Title),
            (BOOKMARK_LEVEL, Key::Level),
            (BOOKMARK_PAGE_NUMBER, Key::PageNumber),
            (BOOKMARK_ZOOM, Key::Zoom),
            (BOOKMARK_Y_OFFSET, Key::YOffset),
        ]
        .into_iter()
        .find_map(|(name, key)| name.eq_ignore_ascii_case(raw).then_some(key))
    }

    /// The key as written in bookmark text.
    pub fn as_str(self) -> &'static str {
        match self {
            Key::Title => BOOKMARK_TITLE,
            Key::Level => BOOKMARK_LEVEL,
            Key::PageNumber => BOOKMARK_PAGE_NUMBER,
            Key::Zoom => BOOKMARK_ZOOM,
            Key::YOffset => BOOKMARK_Y_OFFSET,
        }
    }
}
