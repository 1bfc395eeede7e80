/*!
Render backend seam.

The pipeline never talks to a concrete map renderer. It asks a
[`RenderBackend`] for an offscreen surface, hands it a [`CloneJob`]
describing a non-interactive copy of the live view, and suspends on the
returned [`IdleTicket`] until the clone has settled (tiles fetched, fades
finished, nothing left to draw). Host applications implement the trait over
their real renderer; this crate ships [`SoftwareBackend`], a deterministic
CPU rasterizer used by tests and headless CLI runs.
*/

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::Arc;

use image::RgbaImage;
use mapsheet_core::{
    Camera, ExportError, ExportResult, RequestTransform, RuntimeImage, StyleDocument,
};

/// Everything a backend needs to stand up a render of the cloned view.
///
/// The clone is deliberately inert: no input handling, no attribution
/// control, no tile fade-in, and the drawing buffer is kept readable after
/// present so pixels can be read back.
#[derive(Clone)]
pub struct CloneJob {
    /// Style document, sources already sanitized.
    pub style: StyleDocument,
    pub camera: Camera,
    /// Device pixels per CSS pixel for this render.
    pub pixel_ratio: f64,
    pub interactive: bool,
    pub preserve_drawing_buffer: bool,
    pub fade_duration_ms: u64,
    pub show_attribution: bool,
    pub access_token: Option<String>,
    /// Rewrites tile requests so authenticated sources load in the clone.
    pub request_transform: Option<RequestTransform>,
    /// Runtime-registered images; style serialization does not carry these.
    pub images: Vec<(String, RuntimeImage)>,
}

impl fmt::Debug for CloneJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloneJob")
            .field("camera", &self.camera)
            .field("pixel_ratio", &self.pixel_ratio)
            .field("interactive", &self.interactive)
            .field("preserve_drawing_buffer", &self.preserve_drawing_buffer)
            .field("fade_duration_ms", &self.fade_duration_ms)
            .field("show_attribution", &self.show_attribution)
            .field("images", &self.images.len())
            .field("has_request_transform", &self.request_transform.is_some())
            .finish()
    }
}

/// Lease on an offscreen surface, sized in device pixels.
///
/// Dropping the lease releases the surface with the backend. The shared
/// counter lets callers verify that no surface outlives its export.
pub struct SurfaceLease {
    width: u32,
    height: u32,
    active: Arc<AtomicUsize>,
}

impl SurfaceLease {
    pub fn new(width: u32, height: u32, active: Arc<AtomicUsize>) -> Self {
        active.fetch_add(1, Ordering::SeqCst);
        log::debug!("Offscreen surface acquired: {}x{} device px", width, height);
        Self {
            width,
            height,
            active,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl fmt::Debug for SurfaceLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceLease")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl Drop for SurfaceLease {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
        log::debug!("Offscreen surface released");
    }
}

/// Pixels read back from a settled render, tightly packed RGBA8 rows.
#[derive(Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Frame {
    /// Converts into an [`RgbaImage`], or `None` if the buffer length does
    /// not match the dimensions.
    pub fn into_rgba(self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.pixels)
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pixels", &self.pixels.len())
            .finish()
    }
}

/// Creates the one-shot idle notification pair for a render in flight.
///
/// The backend keeps the [`IdleNotifier`] and fires it exactly once when the
/// clone settles; the pipeline blocks on the [`IdleTicket`].
pub fn idle_channel() -> (IdleNotifier, IdleTicket) {
    let (tx, rx) = mpsc::channel();
    (IdleNotifier { tx }, IdleTicket { rx })
}

/// Sending half of the idle notification. Consumed on use.
pub struct IdleNotifier {
    tx: mpsc::Sender<Frame>,
}

impl IdleNotifier {
    /// Delivers the settled frame. Dropping the notifier without calling
    /// this makes the matching wait fail instead of hanging.
    pub fn finish(self, frame: Frame) {
        // The ticket may already be gone; nothing useful to do then.
        let _ = self.tx.send(frame);
    }
}

/// Receiving half of the idle notification.
pub struct IdleTicket {
    rx: mpsc::Receiver<Frame>,
}

impl IdleTicket {
    /// Blocks until the render settles and yields the frame.
    ///
    /// There is no timeout and no cancellation: a clone that never goes
    /// idle blocks its export indefinitely, exactly like waiting on the
    /// live view's own idle event would. A backend that drops its notifier
    /// unfired turns the wait into an error rather than a hang.
    pub fn wait(self) -> ExportResult<Frame> {
        self.rx
            .recv()
            .map_err(|_| ExportError::render("Renderer went away before reaching idle"))
    }
}

/// A host renderer capable of offscreen clone renders.
pub trait RenderBackend: Send + Sync {
    /// Allocates a hidden surface at the given device pixel size.
    fn create_surface(&self, width: u32, height: u32) -> ExportResult<SurfaceLease>;

    /// Starts rendering `job` into `surface`. Returns the ticket that
    /// resolves once the clone goes idle.
    fn begin_render(&self, surface: &SurfaceLease, job: CloneJob) -> ExportResult<IdleTicket>;
}

/// Deterministic CPU backend: flat style background with a graticule.
///
/// Stands in for a real map renderer where none is attached (tests, CLI
/// smoke runs). Identical inputs produce identical pixels. Renders
/// synchronously, so its idle tickets resolve immediately.
pub struct SoftwareBackend {
    active: Arc<AtomicUsize>,
}

impl SoftwareBackend {
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of surfaces currently leased out.
    pub fn active_surfaces(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

impl Default for SoftwareBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for SoftwareBackend {
    fn create_surface(&self, width: u32, height: u32) -> ExportResult<SurfaceLease> {
        if width == 0 || height == 0 {
            return Err(ExportError::render(format!(
                "Surface dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }
        Ok(SurfaceLease::new(width, height, Arc::clone(&self.active)))
    }

    fn begin_render(&self, surface: &SurfaceLease, job: CloneJob) -> ExportResult<IdleTicket> {
        log::debug!(
            "Software render {}x{} at ratio {}, fade {}ms",
            surface.width(),
            surface.height(),
            job.pixel_ratio,
            job.fade_duration_ms
        );
        let (notifier, ticket) = idle_channel();
        let frame = rasterize(surface.width(), surface.height(), &job);
        notifier.finish(frame);
        Ok(ticket)
    }
}

/// Graticule spacing in CSS pixels; scaled by the job's pixel ratio so the
/// sheet layout is resolution-independent.
const GRID_SPACING_CSS: f64 = 64.0;

const GRID_COLOR: [u8; 3] = [204, 204, 204];
const BORDER_COLOR: [u8; 3] = [68, 68, 68];

fn rasterize(width: u32, height: u32, job: &CloneJob) -> Frame {
    let background = background_color(&job.style).unwrap_or([255, 255, 255]);
    let w = width as usize;
    let h = height as usize;
    let mut pixels = vec![255u8; w * h * 4];
    for px in pixels.chunks_exact_mut(4) {
        px[0] = background[0];
        px[1] = background[1];
        px[2] = background[2];
    }

    let spacing = (GRID_SPACING_CSS * job.pixel_ratio).max(1.0);
    let thickness = (job.pixel_ratio.round().max(1.0)) as usize;

    let mut k = 1usize;
    loop {
        let x = (k as f64 * spacing).round() as usize;
        if x >= w {
            break;
        }
        for dx in 0..thickness.min(w - x) {
            fill_column(&mut pixels, w, h, x + dx, GRID_COLOR);
        }
        k += 1;
    }
    let mut k = 1usize;
    loop {
        let y = (k as f64 * spacing).round() as usize;
        if y >= h {
            break;
        }
        for dy in 0..thickness.min(h - y) {
            fill_row(&mut pixels, w, y + dy, GRID_COLOR);
        }
        k += 1;
    }

    for i in 0..thickness.min(w) {
        fill_column(&mut pixels, w, h, i, BORDER_COLOR);
        fill_column(&mut pixels, w, h, w - 1 - i, BORDER_COLOR);
    }
    for i in 0..thickness.min(h) {
        fill_row(&mut pixels, w, i, BORDER_COLOR);
        fill_row(&mut pixels, w, h - 1 - i, BORDER_COLOR);
    }

    Frame {
        width,
        height,
        pixels,
    }
}

fn fill_column(pixels: &mut [u8], w: usize, h: usize, x: usize, rgb: [u8; 3]) {
    for y in 0..h {
        let at = (y * w + x) * 4;
        pixels[at] = rgb[0];
        pixels[at + 1] = rgb[1];
        pixels[at + 2] = rgb[2];
    }
}

fn fill_row(pixels: &mut [u8], w: usize, y: usize, rgb: [u8; 3]) {
    let start = y * w * 4;
    for px in pixels[start..start + w * 4].chunks_exact_mut(4) {
        px[0] = rgb[0];
        px[1] = rgb[1];
        px[2] = rgb[2];
    }
}

/// First background layer's `background-color`, if the style has one in hex
/// notation.
fn background_color(style: &StyleDocument) -> Option<[u8; 3]> {
    let layers = style.as_value().get("layers")?.as_array()?;
    let background = layers
        .iter()
        .find(|layer| layer.get("type").and_then(|t| t.as_str()) == Some("background"))?;
    let color = background
        .get("paint")?
        .get("background-color")?
        .as_str()?;
    parse_hex_rgb(color)
}

fn parse_hex_rgb(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#')?;
    match hex.len() {
        3 => {
            let mut out = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                out[i] = v * 16 + v;
            }
            Some(out)
        }
        6 => {
            let mut out = [0u8; 3];
            for i in 0..3 {
                out[i] = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
            }
            Some(out)
        }
        _ => None,
    }
}
