/*! Export options panel.

[`ExportPanel`] owns all control state: the open/closed panel, the page and
format selections, the interactive scale input, the error modal and the
in-flight export job. The host embeds it next to its map view, passes the
current map handle into [`ExportPanel::show`] each frame, applies any zoom
the panel requests and delivers artifacts the sink returned in memory.

The export pipeline's pixel-density override is one process-wide global, so
overlap protection lives here: the Generate button is disabled from the
moment a job starts until its completion message arrives. The job runs on a
worker thread against a [`MapSnapshot`] and reports back over a channel the
panel polls once per frame.
*/

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use egui::{Align2, Context, Painter, Rect, Ui};

use mapsheet_core::{
    zoom_for_scale_text, Dpi, ExportRequest, MapHandle, MapSnapshot, Orientation, OutputFormat,
    PageSize, ScaleDisplay,
};
use mapsheet_render::{ExportArtifact, ExportSink, Exporter};

use crate::locale::{Locale, Translation};
use crate::overlay;

/// Construction-time configuration for [`ExportPanel`].
#[derive(Debug, Clone)]
pub struct PanelOptions {
    pub page_size: PageSize,
    pub orientation: Orientation,
    pub format: OutputFormat,
    pub dpi: Dpi,
    /// Draw centre cross lines over the map while the panel is open.
    pub crosshair: bool,
    /// Dim the map outside the selected page's aspect while the panel is open.
    pub printable_area: bool,
    pub locale: Locale,
    pub access_token: Option<String>,
    pub logo: Option<String>,
    /// Rendered logo size on the PDF sheet, in mm.
    pub logo_size: (f64, f64),
    /// Where finished artifacts go.
    pub sink: ExportSink,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            orientation: Orientation::default(),
            format: OutputFormat::default(),
            dpi: Dpi::default(),
            crosshair: false,
            printable_area: false,
            locale: Locale::default(),
            access_token: None,
            logo: None,
            logo_size: (20.0, 20.0),
            sink: ExportSink::Save(std::path::PathBuf::from(".")),
        }
    }
}

/// What a [`ExportPanel::show`] call asks of the host.
#[derive(Debug, Default)]
pub struct PanelOutput {
    /// Zoom the map to this level; produced by a committed scale edit. The
    /// panel cannot move the map itself, the handle is read-only.
    pub zoom_request: Option<f64>,
    /// Artifact from a completed export when the sink is [`ExportSink::Return`].
    pub artifact: Option<ExportArtifact>,
}

struct ExportJob {
    done: Receiver<Result<Option<ExportArtifact>, String>>,
}

/// The export options panel widget.
pub struct ExportPanel {
    exporter: Arc<Exporter>,
    sink: ExportSink,
    strings: &'static Translation,
    access_token: Option<String>,
    logo: Option<String>,
    logo_size: (f64, f64),
    crosshair: bool,
    printable_area: bool,

    open: bool,
    page_size: PageSize,
    orientation: Orientation,
    format: OutputFormat,
    dpi: Dpi,
    scale_text: String,
    last_zoom: Option<f64>,
    title: String,
    subtitle: String,
    error: Option<String>,
    job: Option<ExportJob>,
}

impl ExportPanel {
    pub fn new(exporter: Arc<Exporter>, options: PanelOptions) -> Self {
        Self {
            exporter,
            sink: options.sink,
            strings: options.locale.strings(),
            access_token: options.access_token,
            logo: options.logo,
            logo_size: options.logo_size,
            crosshair: options.crosshair,
            printable_area: options.printable_area,
            open: false,
            page_size: options.page_size,
            orientation: options.orientation,
            format: options.format,
            dpi: options.dpi,
            scale_text: String::new(),
            last_zoom: None,
            title: String::new(),
            subtitle: String::new(),
            error: None,
            job: None,
        }
    }

    /// Panel backed by the built-in deterministic software renderer.
    pub fn software(options: PanelOptions) -> Self {
        Self::new(Arc::new(Exporter::software()), options)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// True from Generate until the worker reports back.
    pub fn is_exporting(&self) -> bool {
        self.job.is_some()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn scale_text(&self) -> &str {
        &self.scale_text
    }

    /// Selected page dimensions in mm, orientation applied.
    pub fn page_mm(&self) -> (f64, f64) {
        self.page_size.oriented_mm(self.orientation)
    }

    /// Draw the panel and handle its interactions for this frame.
    pub fn show(&mut self, ui: &mut Ui, map: Option<&dyn MapHandle>) -> PanelOutput {
        let mut output = PanelOutput::default();

        self.poll_job(ui.ctx(), &mut output);
        if let Some(map) = map {
            self.refresh_scale(map);
        }

        if ui.button("Export").clicked() {
            self.open = !self.open;
        }
        if self.open {
            let modal_up = self.error.is_some();
            ui.add_enabled_ui(!modal_up, |ui| {
                self.panel_body(ui, map, &mut output);
            });
        }
        self.show_error_modal(ui.ctx());

        output
    }

    /// Draw the configured overlays over the host's map view. Call with the
    /// map area's painter after the map itself has been painted.
    pub fn draw_overlays(&self, painter: &Painter, map_view: Rect) {
        if !self.open {
            return;
        }
        if self.crosshair {
            overlay::draw_crosshair(painter, map_view);
        }
        if self.printable_area {
            overlay::draw_printable_area(painter, map_view, self.page_mm());
        }
    }

    fn panel_body(&mut self, ui: &mut Ui, map: Option<&dyn MapHandle>, output: &mut PanelOutput) {
        let s = self.strings;

        egui::Grid::new("mapsheet-export-options")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                ui.label(s.page_size);
                egui::ComboBox::from_id_salt("mapsheet-page-size")
                    .selected_text(self.page_size.as_str())
                    .show_ui(ui, |ui| {
                        for size in PageSize::ALL {
                            ui.selectable_value(&mut self.page_size, size, size.as_str());
                        }
                    });
                ui.end_row();

                ui.label(s.page_orientation);
                egui::ComboBox::from_id_salt("mapsheet-orientation")
                    .selected_text(self.orientation.as_str())
                    .show_ui(ui, |ui| {
                        for orientation in [Orientation::Landscape, Orientation::Portrait] {
                            ui.selectable_value(
                                &mut self.orientation,
                                orientation,
                                orientation.as_str(),
                            );
                        }
                    });
                ui.end_row();

                ui.label(s.format);
                egui::ComboBox::from_id_salt("mapsheet-format")
                    .selected_text(self.format.as_str())
                    .show_ui(ui, |ui| {
                        for format in OutputFormat::ALL {
                            ui.selectable_value(&mut self.format, format, format.as_str());
                        }
                    });
                ui.end_row();

                ui.label(s.dpi);
                egui::ComboBox::from_id_salt("mapsheet-dpi")
                    .selected_text(self.dpi.value().to_string())
                    .show_ui(ui, |ui| {
                        for choice in Dpi::CHOICES {
                            if let Ok(dpi) = Dpi::new(choice) {
                                ui.selectable_value(&mut self.dpi, dpi, choice.to_string());
                            }
                        }
                    });
                ui.end_row();

                ui.label(s.scale);
                ui.horizontal(|ui| {
                    ui.label("1\" =");
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.scale_text).desired_width(80.0),
                    );
                    if response.changed() {
                        self.scale_text
                            .retain(|c| c.is_ascii_digit() || c.is_ascii_whitespace());
                    }
                    if response.lost_focus() {
                        output.zoom_request = self.commit_scale(map);
                    }
                    ui.label("ft");
                });
                ui.end_row();

                if self.format == OutputFormat::Pdf {
                    ui.label(s.title);
                    ui.add(egui::TextEdit::singleline(&mut self.title));
                    ui.end_row();

                    ui.label(s.subtitle);
                    ui.add(egui::TextEdit::singleline(&mut self.subtitle));
                    ui.end_row();
                }
            });

        ui.horizontal(|ui| {
            let generate = ui.add_enabled(self.job.is_none(), egui::Button::new(s.generate));
            if generate.clicked() {
                self.start_export(map);
            }
            if self.job.is_some() {
                ui.spinner();
                ui.label(s.loading);
            }
        });
    }

    /// Mirror the map's zoom into the scale input whenever it moves.
    fn refresh_scale(&mut self, map: &dyn MapHandle) {
        let zoom = map.camera().zoom;
        let moved = self
            .last_zoom
            .map_or(true, |last| (last - zoom).abs() > 1e-9);
        if moved {
            self.scale_text = ScaleDisplay::from_zoom(zoom, map.max_zoom()).input_value();
            self.last_zoom = Some(zoom);
        }
    }

    /// Turn the edited scale text into a zoom request. Invalid input raises
    /// the error modal and leaves the zoom alone.
    fn commit_scale(&mut self, map: Option<&dyn MapHandle>) -> Option<f64> {
        let input = self.scale_text.trim().to_string();
        if input.is_empty() {
            self.error = Some(self.strings.invalid_scale.to_string());
            return None;
        }
        let Some(map) = map else {
            log::error!("Map is not available");
            return None;
        };
        match zoom_for_scale_text(&input, map.max_zoom()) {
            Ok(zoom) => {
                log::debug!("Scale input {} ft maps to zoom {:.2}", input, zoom);
                Some(zoom)
            }
            Err(err) => {
                log::warn!("Rejected scale input: {}", err);
                self.error = Some(self.strings.invalid_scale.to_string());
                None
            }
        }
    }

    fn build_request(&self) -> ExportRequest {
        let mut builder = ExportRequest::builder()
            .page(self.page_size, self.orientation)
            .dpi(self.dpi)
            .format(self.format)
            .logo_size(self.logo_size.0, self.logo_size.1);
        if let Some(token) = &self.access_token {
            builder = builder.access_token(token.clone());
        }
        if let Some(logo) = &self.logo {
            builder = builder.logo(logo.clone());
        }
        let title = self.title.trim();
        if !title.is_empty() {
            builder = builder.title(title);
        }
        let subtitle = self.subtitle.trim();
        if !subtitle.is_empty() {
            builder = builder.subtitle(subtitle);
        }
        builder.build()
    }

    /// Snapshot the map and run the pipeline on a worker thread.
    fn start_export(&mut self, map: Option<&dyn MapHandle>) {
        let Some(map) = map else {
            log::error!("Map is not available");
            return;
        };
        let request = self.build_request();
        let snapshot = MapSnapshot::capture(map);
        let exporter = Arc::clone(&self.exporter);
        let sink = self.sink.clone();
        let (done_tx, done_rx) = mpsc::channel();
        thread::spawn(move || {
            let result = exporter
                .generate(&snapshot, &request, &sink)
                .map_err(|err| format!("{:#}", err));
            let _ = done_tx.send(result);
        });
        self.job = Some(ExportJob { done: done_rx });
    }

    /// One poll per frame. Completion closes the panel; failure raises the
    /// error modal and keeps it open for another attempt.
    fn poll_job(&mut self, ctx: &Context, output: &mut PanelOutput) {
        let Some(job) = &self.job else { return };
        match job.done.try_recv() {
            Ok(Ok(artifact)) => {
                self.job = None;
                self.open = false;
                output.artifact = artifact;
            }
            Ok(Err(message)) => {
                self.job = None;
                self.error = Some(message);
            }
            Err(TryRecvError::Empty) => {
                ctx.request_repaint();
            }
            Err(TryRecvError::Disconnected) => {
                self.job = None;
                self.error = Some("Export worker stopped without reporting a result".to_string());
            }
        }
    }

    fn show_error_modal(&mut self, ctx: &Context) {
        let Some(message) = self.error.clone() else { return };
        egui::Window::new(self.strings.error_title)
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(message);
                ui.vertical_centered(|ui| {
                    if ui.button(self.strings.ok).clicked() {
                        self.error = None;
                    }
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapsheet_core::{Camera, LngLat, StyleDocument};
    use std::sync::Mutex;

    // The pipeline's density override is process-global; tests that actually
    // run an export take this lock so they cannot interleave.
    static SERIAL: Mutex<()> = Mutex::new(());

    fn snapshot() -> MapSnapshot {
        let style = StyleDocument::parse(
            r##"{
                "version": 8,
                "name": "Harbor Base",
                "sources": {},
                "layers": [
                    {"id": "bg", "type": "background", "paint": {"background-color": "#e8e4d8"}}
                ]
            }"##,
        )
        .unwrap();
        MapSnapshot::new(style, Camera::new(LngLat::new(24.9384, 60.1699), 10.0))
    }

    fn panel(options: PanelOptions) -> ExportPanel {
        ExportPanel::software(options)
    }

    #[test]
    fn test_defaults_match_control_options() {
        let p = panel(PanelOptions::default());
        assert!(!p.is_open());
        assert!(!p.is_exporting());
        assert_eq!(p.format, OutputFormat::Pdf);
        assert_eq!(p.page_size, PageSize::A4);
        assert_eq!(p.orientation, Orientation::Landscape);
        assert_eq!(p.dpi.value(), 300);
        assert!(p.error_message().is_none());
    }

    #[test]
    fn test_refresh_scale_follows_zoom_changes() {
        let mut p = panel(PanelOptions::default());
        let map = snapshot();

        p.refresh_scale(&map);
        // 2^(22 - 10) * 4 = 16384 ft per inch.
        assert_eq!(p.scale_text(), "16384");

        // A repeated refresh at the same zoom leaves an edit alone.
        p.scale_text = "typing".to_string();
        p.refresh_scale(&map);
        assert_eq!(p.scale_text(), "typing");

        let moved = MapSnapshot::new(
            snapshot().style(),
            Camera::new(LngLat::new(24.9384, 60.1699), 11.0),
        );
        p.refresh_scale(&moved);
        assert_eq!(p.scale_text(), "8192");
    }

    #[test]
    fn test_commit_scale_requests_matching_zoom() {
        let mut p = panel(PanelOptions::default());
        let map = snapshot();
        p.scale_text = "16384".to_string();

        let zoom = p.commit_scale(Some(&map));
        assert!(p.error_message().is_none());
        let zoom = zoom.unwrap();
        assert!((zoom - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_commit_scale_rejects_empty_and_garbage() {
        let mut p = panel(PanelOptions::default());
        let map = snapshot();

        p.scale_text = "   ".to_string();
        assert!(p.commit_scale(Some(&map)).is_none());
        assert_eq!(p.error_message(), Some("Enter valid input"));

        p.error = None;
        p.scale_text = "not a number".to_string();
        assert!(p.commit_scale(Some(&map)).is_none());
        assert_eq!(p.error_message(), Some("Enter valid input"));
    }

    #[test]
    fn test_commit_scale_without_map_aborts_quietly() {
        let mut p = panel(PanelOptions::default());
        p.scale_text = "16384".to_string();
        assert!(p.commit_scale(None).is_none());
        assert!(p.error_message().is_none());
    }

    #[test]
    fn test_localized_error_message() {
        let mut p = panel(PanelOptions {
            locale: Locale::from_code("fi"),
            ..PanelOptions::default()
        });
        p.scale_text = String::new();
        p.commit_scale(None);
        assert_eq!(p.error_message(), Some("Anna kelvollinen arvo"));
    }

    #[test]
    fn test_build_request_skips_blank_title_and_subtitle() {
        let mut p = panel(PanelOptions::default());
        p.title = "  ".to_string();
        p.subtitle = "Northern Approach".to_string();
        let request = p.build_request();
        assert_eq!(request.title, None);
        assert_eq!(request.subtitle.as_deref(), Some("Northern Approach"));
    }

    #[test]
    fn test_build_request_carries_selections() {
        let mut p = panel(PanelOptions {
            access_token: Some("pk.test".to_string()),
            logo: Some("logo.png".to_string()),
            logo_size: (25.0, 15.0),
            ..PanelOptions::default()
        });
        p.page_size = PageSize::A3;
        p.orientation = Orientation::Portrait;
        p.format = OutputFormat::Jpeg;
        let request = p.build_request();
        assert_eq!((request.width, request.height), (297.0, 420.0));
        assert_eq!(request.format, OutputFormat::Jpeg);
        assert_eq!(request.access_token.as_deref(), Some("pk.test"));
        assert_eq!(request.logo.as_deref(), Some("logo.png"));
        assert_eq!(request.logo_size, (25.0, 15.0));
    }

    #[test]
    fn test_export_round_trip_returns_artifact_and_closes() {
        let _guard = SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut p = panel(PanelOptions {
            format: OutputFormat::Png,
            dpi: Dpi::new(96).unwrap(),
            sink: ExportSink::Return,
            ..PanelOptions::default()
        });
        p.open = true;
        let map = snapshot();

        p.start_export(Some(&map));
        assert!(p.is_exporting());

        // Drain the worker directly instead of spinning frames.
        let job = p.job.take().unwrap();
        let result = job.done.recv().unwrap();
        let artifact = result.unwrap().unwrap();
        assert_eq!(artifact.format, OutputFormat::Png);
        assert!(artifact.file_name.ends_with(".png"));
        assert!(!artifact.bytes.is_empty());
    }

    #[test]
    fn test_failed_export_raises_error_modal() {
        let _guard = SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let missing = tempfile::tempdir().unwrap().path().join("gone");
        let mut p = panel(PanelOptions {
            format: OutputFormat::Png,
            dpi: Dpi::new(96).unwrap(),
            sink: ExportSink::Save(missing.join("out.png")),
            ..PanelOptions::default()
        });
        p.open = true;
        let map = snapshot();

        p.start_export(Some(&map));
        let job = p.job.as_ref().unwrap();
        // Wait for the worker, then let the per-frame poll pick it up.
        let message = job.done.recv().unwrap();
        assert!(message.is_err());

        let ctx = Context::default();
        let mut output = PanelOutput::default();
        p.poll_job(&ctx, &mut output);
        assert!(p.job.is_none());
        assert!(p.is_open());
        assert!(p.error_message().is_some());
        assert!(output.artifact.is_none());
    }

    #[test]
    fn test_poll_job_completion_closes_panel() {
        let mut p = panel(PanelOptions::default());
        p.open = true;
        let (tx, rx) = mpsc::channel();
        p.job = Some(ExportJob { done: rx });

        let ctx = Context::default();
        let mut output = PanelOutput::default();

        // Nothing yet: still exporting, still open.
        p.poll_job(&ctx, &mut output);
        assert!(p.is_exporting());
        assert!(p.is_open());

        tx.send(Ok(None)).unwrap();
        p.poll_job(&ctx, &mut output);
        assert!(!p.is_exporting());
        assert!(!p.is_open());
        assert!(output.artifact.is_none());
    }

    #[test]
    fn test_poll_job_disconnected_worker_reports_error() {
        let mut p = panel(PanelOptions::default());
        p.open = true;
        let (tx, rx) = mpsc::channel::<Result<Option<ExportArtifact>, String>>();
        p.job = Some(ExportJob { done: rx });
        drop(tx);

        let ctx = Context::default();
        let mut output = PanelOutput::default();
        p.poll_job(&ctx, &mut output);
        assert!(p.job.is_none());
        assert!(p.error_message().is_some());
    }

    #[test]
    fn test_start_export_without_map_is_a_no_op() {
        let mut p = panel(PanelOptions::default());
        p.start_export(None);
        assert!(!p.is_exporting());
        assert!(p.error_message().is_none());
    }
}
