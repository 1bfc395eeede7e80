//! MapSheet egui Integration
//!
//! An [`egui`] options panel for driving map sheet exports, plus the map
//! overlays that preview the printed result: a centre crosshair and a
//! printable-area rectangle matching the selected page.
//!
//! The panel is host-agnostic: it never touches the map directly. Each
//! frame the host passes the current [`mapsheet_core::MapHandle`] in and
//! applies whatever [`PanelOutput`] asks for.

pub mod locale;
pub mod overlay;
pub mod panel;

pub use locale::{Locale, Translation};
pub use overlay::{draw_crosshair, draw_printable_area, printable_area_rect};
pub use panel::{ExportPanel, PanelOptions, PanelOutput};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
