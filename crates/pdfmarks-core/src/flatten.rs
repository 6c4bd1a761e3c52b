//! Outline flattening and bookmark text serialization.
//!
//! [`flatten`] linearizes an [`Outline`] into level-tagged [`Bookmark`]
//! records (pre-order, children before the next sibling). [`to_text`] and
//! [`write_bookmarks`] render records in the pdftk `dump_data` layout:
//!
//! ```text
//! BookmarkBegin
//! BookmarkTitle: Chapter 1
//! BookmarkLevel: 1
//! BookmarkPageNumber: 3
//! BookmarkYOffset: 720
//! BookmarkZoom: FitWidth
//! ```
//!
//! `BookmarkPageNumber`, `BookmarkYOffset` and `BookmarkZoom` are omitted when
//! absent, zero, or unset respectively.

use std::fmt::Write as _;
use std::io;

use crate::bookmark::Bookmark;
use crate::error::{BookmarkError, ExportOptions, ExportResult, ExportWarning, WarningCode};
use crate::format::{BOOKMARK_BEGIN, Key};
use crate::outline::{Outline, OutlineItem};
use crate::zoom::from_destination;

/// Flatten `outline` into bookmark records.
///
/// Unsupported destinations and non-navigation bookmarks are exported
/// without a zoom (and without a page for the latter) and reported as
/// warnings. Items nested deeper than `options.max_depth` are skipped.
///
/// # Errors
///
/// Only in strict mode, where the first warning becomes an error.
pub fn flatten(
    outline: &Outline,
    options: &ExportOptions,
) -> Result<ExportResult<Vec<Bookmark>>, BookmarkError> {
    let mut records = Vec::with_capacity(outline.len());
    let mut warnings = Vec::new();

    for (id, level) in outline.walk() {
        let Some(item) = outline.get(id) else {
            continue;
        };
        if let Some(max) = options.max_depth {
            if level > max {
                if level == max + 1 {
                    tracing::warn!(title = %item.title, level, "outline deeper than max_depth, skipping");
                    options.record(
                        &mut warnings,
                        ExportWarning::with_code(
                            WarningCode::DepthLimit,
                            format!("outline nests deeper than {max} levels"),
                        )
                        .for_bookmark(&item.title, level),
                    )?;
                }
                continue;
            }
        }
        records.push(bookmark_from_item(item, level, options, &mut warnings)?);
    }

    tracing::debug!(count = records.len(), "flattened outline");
    Ok(ExportResult::with_warnings(records, warnings))
}

fn bookmark_from_item(
    item: &OutlineItem,
    level: usize,
    options: &ExportOptions,
    warnings: &mut Vec<ExportWarning>,
) -> Result<Bookmark, BookmarkError> {
    let mut bookmark = Bookmark {
        title: item.title.clone(),
        level,
        page_number: None,
        y_offset: 0,
        zoom_type: None,
        zoom: None,
    };

    let Some(dest) = &item.destination else {
        tracing::warn!(title = %item.title, "non-destination bookmark");
        options.record(
            warnings,
            ExportWarning::with_code(WarningCode::NonNavigation, "bookmark has no page destination")
                .for_bookmark(&item.title, level),
        )?;
        return Ok(bookmark);
    };

    bookmark.page_number = dest.page_number();
    if bookmark.page_number.is_none() {
        tracing::warn!(title = %item.title, "destination page is not in the document");
        options.record(
            warnings,
            ExportWarning::with_code(WarningCode::PageOutOfRange, "destination page could not be resolved")
                .for_bookmark(&item.title, level),
        )?;
    }
    match from_destination(&dest.kind) {
        Ok(view) => {
            bookmark.zoom_type = view.zoom_type;
            bookmark.zoom = view.zoom;
            bookmark.y_offset = view.y_offset;
        }
        Err(err) => {
            tracing::warn!(title = %item.title, kind = dest.kind.pdf_name(), "{err}");
            options.record(
                warnings,
                ExportWarning::with_code(
                    WarningCode::UnsupportedDestination,
                    format!("destination kind /{} has no zoom name", dest.kind.pdf_name()),
                )
                .for_bookmark(&item.title, level),
            )?;
        }
    }
    Ok(bookmark)
}

/// Render records as bookmark text, one `\n`-terminated line per field.
pub fn to_text(records: &[Bookmark]) -> String {
    let mut out = String::new();
    for record in records {
        push_record(&mut out, record);
    }
    out
}

/// Write records as bookmark text to `writer`.
pub fn write_bookmarks<W: io::Write>(records: &[Bookmark], writer: &mut W) -> io::Result<()> {
    let mut buf = String::new();
    for record in records {
        buf.clear();
        push_record(&mut buf, record);
        writer.write_all(buf.as_bytes())?;
    }
    Ok(())
}

fn push_record(out: &mut String, record: &Bookmark) {
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{BOOKMARK_BEGIN}");
    let _ = writeln!(out, "{}: {}", Key::Title.as_str(), single_line(&record.title));
    let _ = writeln!(out, "{}: {}", Key::Level.as_str(), record.level);
    if let Some(page) = record.page_number.filter(|&page| page > 0) {
        let _ = writeln!(out, "{}: {page}", Key::PageNumber.as_str());
    }
    if record.y_offset > 0 {
        let _ = writeln!(out, "{}: {}", Key::YOffset.as_str(), record.y_offset);
    }
    if let Some(zoom) = &record.zoom {
        let _ = writeln!(out, "{}: {zoom}", Key::Zoom.as_str());
    }
}

/// Line breaks would split the record, so they become spaces.
fn single_line(title: &str) -> std::borrow::Cow<'_, str> {
    if title.contains(['\r', '\n']) {
        title.replace("\r\n", " ").replace(['\r', '\n'], " ").into()
    } else {
        title.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmark::ZoomType;
    use crate::destination::{Destination, DestinationKind};

    fn fit_width(page_index: usize, top: f64) -> Option<Destination> {
        Some(Destination::new(
            Some(page_index),
            DestinationKind::FitWidth { top: Some(top) },
        ))
    }

    fn sample() -> Outline {
        let mut outline = Outline::new();
        let ch1 = outline.add_root(OutlineItem::new("Chapter 1", fit_width(0, 720.0)));
        outline.add_child(
            ch1,
            OutlineItem::new(
                "Section 1.1",
                Some(Destination::new(
                    Some(1),
                    DestinationKind::Xyz {
                        left: None,
                        top: Some(500.0),
                        zoom: Some(1.5),
                    },
                )),
            ),
        );
        outline.add_root(OutlineItem::new(
            "Chapter 2",
            Some(Destination::new(Some(4), DestinationKind::Fit)),
        ));
        outline
    }

    #[test]
    fn flatten_assigns_levels_in_pre_order() {
        let result = flatten(&sample(), &ExportOptions::default()).unwrap();
        assert!(result.is_clean());
        let records = result.value;
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].title, "Chapter 1");
        assert_eq!(records[0].level, 1);
        assert_eq!(records[0].page_number, Some(1));
        assert_eq!(records[0].y_offset, 720);
        assert_eq!(records[0].zoom.as_deref(), Some("FitWidth"));
        assert_eq!(records[1].level, 2);
        assert_eq!(records[1].zoom_type, Some(ZoomType::ZoomPercent));
        assert_eq!(records[1].zoom.as_deref(), Some("150%"));
        assert_eq!(records[2].level, 1);
        assert_eq!(records[2].page_number, Some(5));
        assert_eq!(records[2].y_offset, 0);
        assert_eq!(records[2].zoom.as_deref(), Some("FitPage"));
    }

    #[test]
    fn text_layout_matches_pdftk() {
        let records = flatten(&sample(), &ExportOptions::default()).unwrap().value;
        let text = to_text(&records);
        let expected = "\
BookmarkBegin
BookmarkTitle: Chapter 1
BookmarkLevel: 1
BookmarkPageNumber: 1
BookmarkYOffset: 720
BookmarkZoom: FitWidth
BookmarkBegin
BookmarkTitle: Section 1.1
BookmarkLevel: 2
BookmarkPageNumber: 2
BookmarkYOffset: 500
BookmarkZoom: 150%
BookmarkBegin
BookmarkTitle: Chapter 2
BookmarkLevel: 1
BookmarkPageNumber: 5
BookmarkZoom: FitPage
";
        assert_eq!(text, expected);
    }

    #[test]
    fn empty_outline_renders_nothing() {
        let records = flatten(&Outline::new(), &ExportOptions::default())
            .unwrap()
            .value;
        assert!(records.is_empty());
        assert_eq!(to_text(&records), "");
    }

    #[test]
    fn unsupported_destination_keeps_page_but_drops_zoom() {
        let mut outline = Outline::new();
        outline.add_root(OutlineItem::new(
            "Figure",
            Some(Destination::new(
                Some(2),
                DestinationKind::Unsupported("FitR".to_string()),
            )),
        ));
        let result = flatten(&outline, &ExportOptions::default()).unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].code, WarningCode::UnsupportedDestination);
        let record = &result.value[0];
        assert_eq!(record.page_number, Some(3));
        assert_eq!(record.zoom, None);
        assert_eq!(
            to_text(&result.value),
            "BookmarkBegin\nBookmarkTitle: Figure\nBookmarkLevel: 1\nBookmarkPageNumber: 3\n"
        );
    }

    #[test]
    fn non_navigation_bookmark_has_no_page() {
        let mut outline = Outline::new();
        outline.add_root(OutlineItem::new("Website", None));
        let result = flatten(&outline, &ExportOptions::default()).unwrap();
        assert_eq!(result.warnings[0].code, WarningCode::NonNavigation);
        assert_eq!(
            to_text(&result.value),
            "BookmarkBegin\nBookmarkTitle: Website\nBookmarkLevel: 1\n"
        );
    }

    #[test]
    fn unresolved_page_is_reported() {
        let mut outline = Outline::new();
        outline.add_root(OutlineItem::new(
            "Lost",
            Some(Destination::new(None, DestinationKind::Fit)),
        ));
        let result = flatten(&outline, &ExportOptions::default()).unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].code, WarningCode::PageOutOfRange);
        assert_eq!(result.value[0].page_number, None);
        assert_eq!(result.value[0].zoom.as_deref(), Some("FitPage"));
    }

    #[test]
    fn strict_mode_fails_on_unsupported_destination() {
        let mut outline = Outline::new();
        outline.add_root(OutlineItem::new(
            "Figure",
            Some(Destination::new(
                Some(0),
                DestinationKind::Unsupported("FitB".to_string()),
            )),
        ));
        let options = ExportOptions {
            strict_mode: true,
            ..ExportOptions::default()
        };
        let err = flatten(&outline, &options).unwrap_err();
        assert!(matches!(err, BookmarkError::UnsupportedDestination(_)));
    }

    #[test]
    fn max_depth_skips_deeper_items_once() {
        let mut outline = Outline::new();
        let a = outline.add_root(OutlineItem::new("a", fit_width(0, 0.0)));
        let b = outline.add_child(a, OutlineItem::new("b", fit_width(0, 0.0)));
        let c = outline.add_child(b, OutlineItem::new("c", fit_width(0, 0.0)));
        outline.add_child(c, OutlineItem::new("d", fit_width(0, 0.0)));
        let options = ExportOptions {
            max_depth: Some(2),
            ..ExportOptions::default()
        };
        let result = flatten(&outline, &options).unwrap();
        let titles: Vec<&str> = result.value.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].code, WarningCode::DepthLimit);
    }

    #[test]
    fn deep_outline_is_unbounded_by_default() {
        let mut outline = Outline::new();
        let mut parent = outline.add_root(OutlineItem::new("level 1", fit_width(0, 0.0)));
        for level in 2..=100 {
            parent = outline.add_child(
                parent,
                OutlineItem::new(format!("level {level}"), fit_width(0, 0.0)),
            );
        }
        let result = flatten(&outline, &ExportOptions::default()).unwrap();
        assert_eq!(result.value.len(), 100);
        assert_eq!(result.value[99].level, 100);
        assert!(result.is_clean());
    }

    #[test]
    fn titles_with_line_breaks_stay_on_one_line() {
        let records = vec![Bookmark::new("Two\r\nLines\nHere", 1, Some(1), 0, None)];
        assert_eq!(
            to_text(&records),
            "BookmarkBegin\nBookmarkTitle: Two Lines Here\nBookmarkLevel: 1\nBookmarkPageNumber: 1\n"
        );
    }

    #[test]
    fn write_bookmarks_matches_to_text() {
        let records = flatten(&sample(), &ExportOptions::default()).unwrap().value;
        let mut buf = Vec::new();
        write_bookmarks(&records, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), to_text(&records));
    }
}
