//! Camera state shared between the live map and its offscreen clone.

use serde::{Deserialize, Serialize};

/// Geographic coordinate, longitude first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

/// Viewpoint of a map: everything the clone needs to frame the same view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub center: LngLat,
    pub zoom: f64,
    #[serde(default)]
    pub bearing: f64,
    #[serde(default)]
    pub pitch: f64,
}

impl Camera {
    pub fn new(center: LngLat, zoom: f64) -> Self {
        Self { center, zoom, bearing: 0.0, pitch: 0.0 }
    }

    pub fn with_bearing(mut self, bearing: f64) -> Self {
        self.bearing = bearing;
        self
    }

    pub fn with_pitch(mut self, pitch: f64) -> Self {
        self.pitch = pitch;
        self
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(LngLat::new(0.0, 0.0), 0.0)
    }
}
