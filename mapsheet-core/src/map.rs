//! The seam between MapSheet and a host map component.
//!
//! The pipeline never talks to a concrete renderer. It reads everything it
//! needs through [`MapHandle`] and freezes it into a [`MapSnapshot`] so the
//! export can run off the UI thread while the live map keeps moving.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::camera::Camera;
use crate::style::StyleDocument;

/// Default zoom ceiling when the host does not report one.
pub const DEFAULT_MAX_ZOOM: f64 = 22.0;

/// A tile or resource request about to be issued by a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct TileRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl TileRequest {
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self { url: url.into(), headers: Vec::new() }
    }
}

/// Hook that rewrites outgoing tile requests, typically to attach
/// authentication. Propagated from the live map into its clone so
/// authenticated sources keep loading there.
pub type RequestTransform = Arc<dyn Fn(&mut TileRequest) + Send + Sync>;

/// Pixel data registered on the live map at runtime (`addImage` style).
/// Style serialization does not carry these, so the pipeline copies them
/// into the clone by hand.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeImage {
    pub width: u32,
    pub height: u32,
    /// RGBA8, row-major.
    pub data: Vec<u8>,
}

impl RuntimeImage {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self { width, height, data }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }
}

/// What the export pipeline needs from a live map.
pub trait MapHandle {
    fn style(&self) -> StyleDocument;
    fn camera(&self) -> Camera;

    fn max_zoom(&self) -> f64 {
        DEFAULT_MAX_ZOOM
    }

    fn images(&self) -> HashMap<String, RuntimeImage> {
        HashMap::new()
    }

    fn request_transform(&self) -> Option<RequestTransform> {
        None
    }
}

/// A frozen copy of a live map's exportable state.
#[derive(Clone)]
pub struct MapSnapshot {
    style: StyleDocument,
    camera: Camera,
    max_zoom: f64,
    images: HashMap<String, RuntimeImage>,
    request_transform: Option<RequestTransform>,
}

impl MapSnapshot {
    pub fn new(style: StyleDocument, camera: Camera) -> Self {
        Self {
            style,
            camera,
            max_zoom: DEFAULT_MAX_ZOOM,
            images: HashMap::new(),
            request_transform: None,
        }
    }

    /// Freeze another handle's state.
    pub fn capture(map: &dyn MapHandle) -> Self {
        Self {
            style: map.style(),
            camera: map.camera(),
            max_zoom: map.max_zoom(),
            images: map.images(),
            request_transform: map.request_transform(),
        }
    }

    pub fn with_max_zoom(mut self, max_zoom: f64) -> Self {
        self.max_zoom = max_zoom;
        self
    }

    pub fn with_image<S: Into<String>>(mut self, name: S, image: RuntimeImage) -> Self {
        self.images.insert(name.into(), image);
        self
    }

    pub fn with_request_transform(mut self, transform: RequestTransform) -> Self {
        self.request_transform = Some(transform);
        self
    }
}

impl MapHandle for MapSnapshot {
    fn style(&self) -> StyleDocument {
        self.style.clone()
    }

    fn camera(&self) -> Camera {
        self.camera
    }

    fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    fn images(&self) -> HashMap<String, RuntimeImage> {
        self.images.clone()
    }

    fn request_transform(&self) -> Option<RequestTransform> {
        self.request_transform.clone()
    }
}

impl fmt::Debug for MapSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapSnapshot")
            .field("style_name", &self.style.name())
            .field("camera", &self.camera)
            .field("max_zoom", &self.max_zoom)
            .field("images", &self.images.len())
            .field("has_request_transform", &self.request_transform.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::LngLat;
    use serde_json::json;

    fn snapshot() -> MapSnapshot {
        let style = StyleDocument::new(json!({"version": 8, "name": "Test"})).unwrap();
        MapSnapshot::new(style, Camera::new(LngLat::new(11.25, 43.77), 12.5))
            .with_max_zoom(20.0)
            .with_image("marker", RuntimeImage::new(2, 2, vec![255; 16]))
    }

    #[test]
    fn test_capture_copies_all_state() {
        let original = snapshot();
        let captured = MapSnapshot::capture(&original);
        assert_eq!(captured.camera(), original.camera());
        assert_eq!(captured.max_zoom(), 20.0);
        assert_eq!(captured.images().len(), 1);
        assert!(captured.request_transform().is_none());
    }

    #[test]
    fn test_request_transform_applies() {
        let transform: RequestTransform = Arc::new(|req: &mut TileRequest| {
            req.url.push_str("?access_token=secret");
        });
        let map = snapshot().with_request_transform(transform);
        let hook = map.request_transform().unwrap();
        let mut request = TileRequest::new("https://tiles.example.com/1/2/3.pbf");
        hook(&mut request);
        assert!(request.url.ends_with("access_token=secret"));
    }

    #[test]
    fn test_runtime_image_emptiness() {
        assert!(RuntimeImage::new(0, 4, vec![0; 16]).is_empty());
        assert!(RuntimeImage::new(4, 4, Vec::new()).is_empty());
        assert!(!RuntimeImage::new(1, 1, vec![0, 0, 0, 255]).is_empty());
    }
}
