//! Export requests.
//!
//! One [`ExportRequest`] is built per Generate click and dropped afterwards.
//! Page orientation is applied while building, so the pipeline only ever
//! sees final physical dimensions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ExportError, ExportResult};
use crate::pages::{Orientation, PageSize};
use crate::units::{to_pixels, Dpi, Unit, CSS_DPI};

/// Supported output formats.
///
/// Parsing happens at the UI/CLI boundary; a name outside this set (say
/// `tiff`) is rejected before any render work starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Jpeg,
    Pdf,
    Svg,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Png,
        OutputFormat::Jpeg,
        OutputFormat::Pdf,
        OutputFormat::Svg,
    ];

    /// File extension used for output names (`jpg`, not `jpeg`).
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Svg => "svg",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Png => "PNG",
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Pdf => "PDF",
            OutputFormat::Svg => "SVG",
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Pdf
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> ExportResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "pdf" => Ok(OutputFormat::Pdf),
            "svg" => Ok(OutputFormat::Svg),
            other => Err(ExportError::unsupported_format(other)),
        }
    }
}

/// Immutable description of one export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    /// Physical sheet width, orientation already applied.
    pub width: f64,
    /// Physical sheet height, orientation already applied.
    pub height: f64,
    pub unit: Unit,
    pub dpi: Dpi,
    pub format: OutputFormat,
    pub access_token: Option<String>,
    /// Logo source for the PDF footer: an http(s) URL or a local file path.
    pub logo: Option<String>,
    /// Logo rendered size in millimeters.
    pub logo_size: (f64, f64),
    pub title: Option<String>,
    pub subtitle: Option<String>,
}

impl ExportRequest {
    pub fn builder() -> ExportRequestBuilder {
        ExportRequestBuilder::default()
    }

    /// Sheet size in CSS pixels (96 dpi reference). This is what the clone's
    /// layout container uses; the density override does the rest.
    pub fn css_size(&self) -> (u32, u32) {
        self.pixel_size(CSS_DPI)
    }

    /// Sheet size in device pixels at the requested print resolution.
    pub fn device_size(&self) -> (u32, u32) {
        self.pixel_size(f64::from(self.dpi.value()))
    }

    fn pixel_size(&self, conversion_factor: f64) -> (u32, u32) {
        let w = to_pixels(self.width, self.unit, conversion_factor);
        let h = to_pixels(self.height, self.unit, conversion_factor);
        (w.round() as u32, h.round() as u32)
    }

    /// Default output name, `map-export-YYYY-MM-DD.<ext>`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", default_file_stem(), self.format.extension())
    }
}

/// Stem used when the caller does not name the output file.
pub fn default_file_stem() -> String {
    format!("map-export-{}", chrono::Local::now().format("%Y-%m-%d"))
}

/// Builder for [`ExportRequest`].
#[derive(Debug, Clone)]
pub struct ExportRequestBuilder {
    page_size: PageSize,
    orientation: Orientation,
    custom_size: Option<(f64, f64, Unit)>,
    dpi: Dpi,
    format: OutputFormat,
    access_token: Option<String>,
    logo: Option<String>,
    logo_size: (f64, f64),
    title: Option<String>,
    subtitle: Option<String>,
}

impl Default for ExportRequestBuilder {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            orientation: Orientation::default(),
            custom_size: None,
            dpi: Dpi::default(),
            format: OutputFormat::default(),
            access_token: None,
            logo: None,
            logo_size: (20.0, 20.0),
            title: None,
            subtitle: None,
        }
    }
}

impl ExportRequestBuilder {
    pub fn page(mut self, size: PageSize, orientation: Orientation) -> Self {
        self.page_size = size;
        self.orientation = orientation;
        self.custom_size = None;
        self
    }

    /// Bypass the catalog with explicit physical dimensions.
    pub fn custom_size(mut self, width: f64, height: f64, unit: Unit) -> Self {
        self.custom_size = Some((width, height, unit));
        self
    }

    pub fn dpi(mut self, dpi: Dpi) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn access_token<S: Into<String>>(mut self, token: S) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn logo<S: Into<String>>(mut self, logo: S) -> Self {
        self.logo = Some(logo.into());
        self
    }

    pub fn logo_size(mut self, width: f64, height: f64) -> Self {
        self.logo_size = (width, height);
        self
    }

    pub fn title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn subtitle<S: Into<String>>(mut self, subtitle: S) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn build(self) -> ExportRequest {
        let (width, height, unit) = match self.custom_size {
            Some(custom) => custom,
            None => {
                let (w, h) = self.page_size.oriented_mm(self.orientation);
                (w, h, Unit::Mm)
            }
        };
        ExportRequest {
            width,
            height,
            unit,
            dpi: self.dpi,
            format: self.format,
            access_token: self.access_token,
            logo: self.logo,
            logo_size: self.logo_size,
            title: self.title,
            subtitle: self.subtitle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_landscape_print_dimensions() {
        let request = ExportRequest::builder()
            .page(PageSize::A4, Orientation::Landscape)
            .dpi(Dpi::new(300).unwrap())
            .build();
        assert_eq!(request.device_size(), (3508, 2480));
        assert_eq!(request.css_size(), (1123, 794));
    }

    #[test]
    fn test_portrait_swaps_page_dimensions() {
        let request = ExportRequest::builder()
            .page(PageSize::A4, Orientation::Portrait)
            .build();
        assert_eq!((request.width, request.height), (210.0, 297.0));
    }

    #[test]
    fn test_custom_size_in_inches() {
        let request = ExportRequest::builder()
            .custom_size(11.0, 8.5, Unit::In)
            .dpi(Dpi::new(96).unwrap())
            .build();
        assert_eq!(request.device_size(), (1056, 816));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("png".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert_eq!("JPEG".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!("jpg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert!(matches!(
            "tiff".parse::<OutputFormat>(),
            Err(ExportError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_file_name_carries_iso_date_and_extension() {
        let request = ExportRequest::builder().format(OutputFormat::Jpeg).build();
        let name = request.file_name();
        assert!(name.starts_with("map-export-"));
        assert!(name.ends_with(".jpg"));
        // map-export-YYYY-MM-DD.jpg
        assert_eq!(name.len(), "map-export-0000-00-00.jpg".len());
    }

    #[test]
    fn test_default_format_is_pdf() {
        assert_eq!(ExportRequest::builder().build().format, OutputFormat::Pdf);
    }
}
