//! Mapping between zoom names and PDF destination kinds.
//!
//! `BookmarkZoom` values are either one of the [`ZoomType`] names or a
//! percentage such as `125%`. On import they become a [`DestinationKind`];
//! on export a destination kind is turned back into a zoom name.

use crate::bookmark::ZoomType;
use crate::destination::{Destination, DestinationKind};
use crate::error::BookmarkError;

/// Zoom information recovered from a destination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoomView {
    /// The recognised zoom type, `None` when unset.
    pub zoom_type: Option<ZoomType>,
    /// The text written to `BookmarkZoom`.
    pub zoom: Option<String>,
    /// Vertical offset on the page (0 = none).
    pub y_offset: u32,
}

/// Identify the zoom type named by `raw`.
///
/// A trailing `%` means [`ZoomType::ZoomPercent`]; otherwise the enum names
/// are matched case-insensitively. Anything else is unrecognised and yields
/// `None`, which callers treat as "unset" rather than an error.
pub fn identify_zoom_type(raw: &str) -> Option<ZoomType> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.ends_with('%') {
        return Some(ZoomType::ZoomPercent);
    }
    ZoomType::ALL
        .into_iter()
        .find(|zoom_type| zoom_type.name().eq_ignore_ascii_case(raw))
}

/// Parse the factor of a percentage zoom: `"125%"` is `1.25`.
pub fn parse_zoom_percent(raw: &str) -> Option<f64> {
    let digits = raw.trim().strip_suffix('%')?.trim();
    let percent: f64 = digits.parse().ok()?;
    percent.is_finite().then_some(percent / 100.0)
}

/// Format a zoom factor as a percentage: `1.25` is `"125%"`.
pub fn format_zoom_percent(factor: f64) -> String {
    format!("{}%", (factor * 100.0).round() as i64)
}

/// Build the destination for an imported bookmark.
///
/// Unset, unrecognised and `FitWidth` zooms all produce a fit-width
/// destination at `y_offset`. This never fails: a percentage that does not
/// parse falls back to fit-width as well.
pub fn to_destination(
    zoom_type: Option<ZoomType>,
    zoom_raw: Option<&str>,
    y_offset: u32,
    page_index: Option<usize>,
) -> Destination {
    let top = Some(f64::from(y_offset));
    let kind = match zoom_type {
        Some(ZoomType::Inherit) => DestinationKind::Xyz {
            left: None,
            top,
            zoom: None,
        },
        Some(ZoomType::ZoomPercent) => match zoom_raw.and_then(parse_zoom_percent) {
            Some(factor) => DestinationKind::Xyz {
                left: None,
                top,
                zoom: Some(factor),
            },
            None => {
                tracing::warn!(
                    zoom = zoom_raw.unwrap_or_default(),
                    "unparseable zoom percentage, falling back to FitWidth"
                );
                DestinationKind::FitWidth { top }
            }
        },
        Some(ZoomType::FitPage) => DestinationKind::Fit,
        Some(ZoomType::FitHeight) => DestinationKind::FitHeight { left: None },
        Some(ZoomType::FitWidth) | None => DestinationKind::FitWidth { top },
    };
    Destination::new(page_index, kind)
}

/// Recover the zoom name and offset from a destination kind.
///
/// # Errors
///
/// Returns [`BookmarkError::UnsupportedDestination`] for kinds without a
/// zoom name. Exporters downgrade this to a warning.
pub fn from_destination(kind: &DestinationKind) -> Result<ZoomView, BookmarkError> {
    let view = match kind {
        DestinationKind::Xyz { top, zoom, .. } => match zoom {
            Some(factor) if *factor > 0.0 => ZoomView {
                zoom_type: Some(ZoomType::ZoomPercent),
                zoom: Some(format_zoom_percent(*factor)),
                y_offset: offset_from(*top),
            },
            _ => named(ZoomType::Inherit, offset_from(*top)),
        },
        DestinationKind::FitWidth { top } => named(ZoomType::FitWidth, offset_from(*top)),
        DestinationKind::Fit => named(ZoomType::FitPage, 0),
        DestinationKind::FitHeight { .. } => named(ZoomType::FitHeight, 0),
        DestinationKind::Unsupported(name) => {
            return Err(BookmarkError::UnsupportedDestination(name.clone()));
        }
    };
    Ok(view)
}

fn named(zoom_type: ZoomType, y_offset: u32) -> ZoomView {
    ZoomView {
        zoom_type: Some(zoom_type),
        zoom: Some(zoom_type.name().to_string()),
        y_offset,
    }
}

/// Offsets are whole points; missing or negative tops count as 0.
fn offset_from(top: Option<f64>) -> u32 {
    match top {
        Some(top) if top.is_finite() && top > 0.0 => top.round().min(f64::from(u32::MAX)) as u32,
        _ => 0,
    }
}
