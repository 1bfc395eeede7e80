//! Physical units and raster resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ExportError, ExportResult};

/// Millimeters per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// CSS reference resolution. Conversions use this factor unless a
/// resolution-adjusted factor is passed explicitly.
pub const CSS_DPI: f64 = 96.0;

/// Physical unit for page dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Mm,
    In,
}

impl Default for Unit {
    fn default() -> Self {
        Unit::Mm
    }
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Mm => "mm",
            Unit::In => "in",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = ExportError;

    fn from_str(s: &str) -> ExportResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mm" => Ok(Unit::Mm),
            "in" => Ok(Unit::In),
            other => Err(ExportError::unknown_unit(other)),
        }
    }
}

/// Convert a physical length to pixels.
///
/// Millimeter lengths are first normalized through [`MM_PER_INCH`]; inch
/// lengths multiply the factor directly. `conversion_factor` is [`CSS_DPI`]
/// for layout pixels and the target print resolution for device pixels.
pub fn to_pixels(length: f64, unit: Unit, conversion_factor: f64) -> f64 {
    match unit {
        Unit::Mm => (conversion_factor / MM_PER_INCH) * length,
        Unit::In => conversion_factor * length,
    }
}

/// Print resolution in dots per inch, restricted to the selectable catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Dpi(u32);

impl Dpi {
    /// Resolutions offered by the options panel.
    pub const CHOICES: [u32; 5] = [72, 96, 200, 300, 400];

    pub fn new(value: u32) -> ExportResult<Self> {
        if Self::CHOICES.contains(&value) {
            Ok(Dpi(value))
        } else {
            Err(ExportError::unsupported_dpi(value.to_string()))
        }
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Density override applied while the offscreen clone renders, relative
    /// to the CSS reference resolution.
    pub fn pixel_ratio(self) -> f64 {
        f64::from(self.0) / CSS_DPI
    }
}

impl Default for Dpi {
    fn default() -> Self {
        Dpi(300)
    }
}

impl fmt::Display for Dpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Dpi {
    type Error = ExportError;

    fn try_from(value: u32) -> ExportResult<Self> {
        Dpi::new(value)
    }
}

impl From<Dpi> for u32 {
    fn from(dpi: Dpi) -> u32 {
        dpi.0
    }
}

impl FromStr for Dpi {
    type Err = ExportError;

    fn from_str(s: &str) -> ExportResult<Self> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|_| ExportError::unsupported_dpi(s.trim()))?;
        Dpi::new(value)
    }
}
