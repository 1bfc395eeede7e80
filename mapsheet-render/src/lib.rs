//! MapSheet Render Library
//!
//! The offscreen export pipeline: device-pixel-ratio override, render
//! backend seam with a deterministic software rasterizer, format encoders
//! (PNG, JPEG, PDF sheet, experimental SVG), logo loading, and delivery
//! sinks. PDF support sits behind the `printpdf` feature and SVG behind
//! `vector-export`, both on by default.

pub mod backend;
pub mod encoder;
pub mod logo;
pub mod pipeline;
pub mod progress;
pub mod ratio;
pub mod sink;

// Re-export commonly used types and functions
pub use backend::{
    idle_channel, CloneJob, Frame, IdleNotifier, IdleTicket, RenderBackend, SoftwareBackend,
    SurfaceLease,
};
pub use encoder::{encode, SheetInfo};
pub use logo::load_logo;
pub use pipeline::Exporter;
pub use progress::{NoProgress, ProgressListener};
pub use ratio::{current_pixel_ratio, PixelRatioOverride};
pub use sink::{ExportArtifact, ExportSink};

/// Version information for the MapSheet render library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
