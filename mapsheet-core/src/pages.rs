//! Page size catalog and sheet orientation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ExportError, ExportResult};

/// Named page sizes offered by the export panel.
///
/// Catalog pairs are landscape-major millimeters (long edge first);
/// orientation decides which edge becomes the sheet width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    Letter,
    A2,
    A3,
    A4,
    A5,
    A6,
    B2,
    B3,
    B4,
    B5,
    B6,
}

impl PageSize {
    /// Every catalog entry, in panel order.
    pub const ALL: [PageSize; 11] = [
        PageSize::Letter,
        PageSize::A2,
        PageSize::A3,
        PageSize::A4,
        PageSize::A5,
        PageSize::A6,
        PageSize::B2,
        PageSize::B3,
        PageSize::B4,
        PageSize::B5,
        PageSize::B6,
    ];

    /// Landscape-major (width, height) in millimeters.
    pub fn dimensions_mm(self) -> (f64, f64) {
        match self {
            PageSize::Letter => (279.0, 216.0),
            PageSize::A2 => (594.0, 420.0),
            PageSize::A3 => (420.0, 297.0),
            PageSize::A4 => (297.0, 210.0),
            PageSize::A5 => (210.0, 148.0),
            PageSize::A6 => (148.0, 105.0),
            PageSize::B2 => (707.0, 500.0),
            PageSize::B3 => (500.0, 353.0),
            PageSize::B4 => (353.0, 250.0),
            PageSize::B5 => (250.0, 176.0),
            PageSize::B6 => (176.0, 125.0),
        }
    }

    /// Sheet (width, height) in millimeters for the given orientation.
    pub fn oriented_mm(self, orientation: Orientation) -> (f64, f64) {
        orientation.apply(self.dimensions_mm())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PageSize::Letter => "Letter",
            PageSize::A2 => "A2",
            PageSize::A3 => "A3",
            PageSize::A4 => "A4",
            PageSize::A5 => "A5",
            PageSize::A6 => "A6",
            PageSize::B2 => "B2",
            PageSize::B3 => "B3",
            PageSize::B4 => "B4",
            PageSize::B5 => "B5",
            PageSize::B6 => "B6",
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageSize {
    type Err = ExportError;

    fn from_str(s: &str) -> ExportResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "letter" => Ok(PageSize::Letter),
            "a2" => Ok(PageSize::A2),
            "a3" => Ok(PageSize::A3),
            "a4" => Ok(PageSize::A4),
            "a5" => Ok(PageSize::A5),
            "a6" => Ok(PageSize::A6),
            "b2" => Ok(PageSize::B2),
            "b3" => Ok(PageSize::B3),
            "b4" => Ok(PageSize::B4),
            "b5" => Ok(PageSize::B5),
            "b6" => Ok(PageSize::B6),
            other => Err(ExportError::unknown_page_size(other)),
        }
    }
}

/// Sheet orientation. Landscape keeps the catalog pair, portrait swaps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    pub fn apply(self, (width, height): (f64, f64)) -> (f64, f64) {
        match self {
            Orientation::Landscape => (width, height),
            Orientation::Portrait => (height, width),
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Orientation::Landscape => Orientation::Portrait,
            Orientation::Portrait => Orientation::Landscape,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Landscape => "Landscape",
            Orientation::Portrait => "Portrait",
        }
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation::Landscape
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = ExportError;

    fn from_str(s: &str) -> ExportResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "landscape" | "l" => Ok(Orientation::Landscape),
            "portrait" | "p" => Ok(Orientation::Portrait),
            other => Err(ExportError::unknown_orientation(other)),
        }
    }
}
