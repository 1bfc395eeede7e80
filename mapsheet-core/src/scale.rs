//! Scale and zoom math.
//!
//! Two scale notions live side by side. The panel's interactive scale input
//! uses the zoom-anchored approximation `2^(max_zoom - zoom) * 4`, which is
//! invertible so typing a scale can drive the zoom. The PDF footer instead
//! reports the Web Mercator ground scale derived from the scale denominator
//! at zoom 0 for a 96 dpi display.

use crate::error::{ExportError, ExportResult};

/// Web Mercator scale denominator at zoom 0, 96 dpi.
const SCALE_DENOMINATOR_Z0: f64 = 591_657_550.5;

const INCHES_PER_FOOT: f64 = 12.0;

/// Approximate ground scale for the interactive scale input,
/// in feet per displayed inch.
pub fn scale_for_zoom(zoom: f64, max_zoom: f64) -> f64 {
    2f64.powf(max_zoom - zoom) * 4.0
}

/// Zoom level that produces the given scale. Inverse of [`scale_for_zoom`].
pub fn zoom_for_scale(scale: f64, max_zoom: f64) -> ExportResult<f64> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(ExportError::invalid_scale(scale.to_string()));
    }
    Ok(max_zoom - (scale / 4.0).log2())
}

/// Ground scale for the PDF footer, in whole feet per inch at the given zoom.
pub fn ground_scale_feet(zoom: f64) -> u64 {
    ((SCALE_DENOMINATOR_Z0 / 2f64.powf(zoom + 1.0)) / INCHES_PER_FOOT).round() as u64
}

/// Display form of the interactive scale, `1" = N ft`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleDisplay {
    feet: f64,
}

impl ScaleDisplay {
    pub fn from_zoom(zoom: f64, max_zoom: f64) -> Self {
        Self { feet: scale_for_zoom(zoom, max_zoom) }
    }

    pub fn feet(&self) -> f64 {
        self.feet
    }

    /// Full label for the scale input, e.g. `1" = 512 ft`.
    pub fn label(&self) -> String {
        format!("1\" = {:.0} ft", self.feet)
    }

    /// The bare numeric part shown while the input is being edited.
    pub fn input_value(&self) -> String {
        format!("{:.0}", self.feet)
    }

    /// Parse user scale text, accepting either the bare number or the
    /// decorated `1" = N ft` form. Empty or non-numeric input is rejected;
    /// the caller surfaces that as a modal prompt and leaves the zoom alone.
    fn parse(input: &str) -> ExportResult<f64> {
        let stripped = input
            .replace("1\" = ", "")
            .replace("1\" =", "")
            .replace(" ft", "");
        let trimmed = stripped.trim();
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v > 0.0)
            .ok_or_else(|| ExportError::invalid_scale(input))
    }
}

/// Parse scale text and solve for the zoom that produces it.
pub fn zoom_for_scale_text(input: &str, max_zoom: f64) -> ExportResult<f64> {
    let feet = ScaleDisplay::parse(input)?;
    zoom_for_scale(feet, max_zoom)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX_ZOOM: f64 = 22.0;

    #[test]
    fn test_scale_monotonically_non_increasing_in_zoom() {
        let mut previous = f64::INFINITY;
        let mut z = 0.0;
        while z <= MAX_ZOOM {
            let scale = scale_for_zoom(z, MAX_ZOOM);
            assert!(scale <= previous, "scale increased at zoom {z}");
            previous = scale;
            z += 0.25;
        }
    }

    #[test]
    fn test_scale_zoom_round_trip() {
        for z in [0.0, 3.5, 10.0, 17.25, 21.9] {
            let scale = scale_for_zoom(z, MAX_ZOOM);
            let zoom = zoom_for_scale(scale, MAX_ZOOM).unwrap();
            assert!((zoom - z).abs() < 1e-9);
        }
    }

    #[test]
    fn test_display_round_trip_within_rounding() {
        let display = ScaleDisplay::from_zoom(13.3, MAX_ZOOM);
        let reparsed = ScaleDisplay::parse(&display.label()).unwrap();
        assert!((reparsed - display.feet()).abs() <= 0.5);
    }

    #[test]
    fn test_parse_accepts_bare_and_decorated_forms() {
        assert_eq!(ScaleDisplay::parse("512").unwrap(), 512.0);
        assert_eq!(ScaleDisplay::parse("1\" = 512 ft").unwrap(), 512.0);
        assert_eq!(ScaleDisplay::parse("  2048  ").unwrap(), 2048.0);
    }

    #[test]
    fn test_parse_rejects_invalid_input() {
        for bad in ["abc", "", "  ", "NaN", "-40", "0"] {
            assert!(
                matches!(
                    ScaleDisplay::parse(bad),
                    Err(ExportError::InvalidScale { .. })
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_zoom_for_scale_text() {
        // 2^(22 - z) * 4 = 1024  =>  z = 14
        let zoom = zoom_for_scale_text("1024", MAX_ZOOM).unwrap();
        assert!((zoom - 14.0).abs() < 1e-9);
        assert!(zoom_for_scale_text("abc", MAX_ZOOM).is_err());
    }

    #[test]
    fn test_ground_scale_feet() {
        assert_eq!(ground_scale_feet(10.0), 24_075);
        assert_eq!(ground_scale_feet(0.0), 24_652_398);
        assert!(ground_scale_feet(5.0) > ground_scale_feet(6.0));
    }
}
