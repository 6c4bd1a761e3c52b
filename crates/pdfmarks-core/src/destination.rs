//! PDF destination descriptors.
//!
//! A [`Destination`] is the backend-neutral form of an explicit PDF
//! destination array such as `[page /XYZ left top zoom]`.

/// The view part of a destination.
///
/// Only the four kinds with a zoom name are modelled precisely; every other
/// kind is carried as [`DestinationKind::Unsupported`] with its PDF name.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DestinationKind {
    /// `/XYZ left top zoom`. A `None` or non-positive zoom keeps the viewer zoom.
    Xyz {
        left: Option<f64>,
        top: Option<f64>,
        zoom: Option<f64>,
    },
    /// `/Fit`: whole page.
    Fit,
    /// `/FitH top`: fit width.
    FitWidth { top: Option<f64> },
    /// `/FitV left`: fit height.
    FitHeight { left: Option<f64> },
    /// Any other kind (`/FitR`, `/FitB`, `/FitBH`, `/FitBV`, unknown names).
    Unsupported(String),
}

impl DestinationKind {
    /// The PDF name of this destination kind.
    pub fn pdf_name(&self) -> &str {
        match self {
            DestinationKind::Xyz { .. } => "XYZ",
            DestinationKind::Fit => "Fit",
            DestinationKind::FitWidth { .. } => "FitH",
            DestinationKind::FitHeight { .. } => "FitV",
            DestinationKind::Unsupported(name) => name,
        }
    }
}

/// A page plus view instructions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Destination {
    /// 0-based page index, `None` if the page could not be resolved.
    pub page_index: Option<usize>,
    /// How the page is displayed.
    pub kind: DestinationKind,
}

impl Destination {
    /// Create a destination on the given 0-based page.
    pub fn new(page_index: Option<usize>, kind: DestinationKind) -> Self {
        Self { page_index, kind }
    }

    /// The 1-based page number, as used in bookmark text.
    pub fn page_number(&self) -> Option<usize> {
        self.page_index.map(|index| index + 1)
    }
}
