//! MapSheet Core Library
//!
//! Page catalog, unit and scale math, style/camera model, and the map-handle
//! seam consumed by the MapSheet export pipeline.

pub mod camera;
pub mod error;
pub mod map;
pub mod pages;
pub mod request;
pub mod scale;
pub mod style;
pub mod units;

// Re-export commonly used types and functions
pub use camera::{Camera, LngLat};
pub use error::{ExportError, ExportResult};
pub use map::{MapHandle, MapSnapshot, RequestTransform, RuntimeImage, TileRequest};
pub use pages::{Orientation, PageSize};
pub use request::{ExportRequest, ExportRequestBuilder, OutputFormat};
pub use scale::{
    ground_scale_feet, scale_for_zoom, zoom_for_scale, zoom_for_scale_text, ScaleDisplay,
};
pub use style::StyleDocument;
pub use units::{to_pixels, Dpi, Unit, CSS_DPI, MM_PER_INCH};

/// Version information for the MapSheet core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
