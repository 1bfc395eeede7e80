//! Export command implementation - render a styled map view to a print-ready
//! sheet without a running GUI.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use indicatif::ProgressBar;
use mapsheet_core::{
    Camera, Dpi, ExportRequest, LngLat, MapSnapshot, Orientation, OutputFormat, PageSize,
    StyleDocument, Unit,
};
use mapsheet_render::{ExportSink, Exporter, ProgressListener};

use crate::config::Config;

/// Terminal spinner shown for the duration of the pipeline run.
struct SpinnerProgress {
    bar: ProgressBar,
}

impl SpinnerProgress {
    fn new() -> Self {
        Self {
            bar: ProgressBar::new_spinner(),
        }
    }
}

impl ProgressListener for SpinnerProgress {
    fn started(&self) {
        self.bar.set_message("Rendering map sheet...");
        self.bar.enable_steady_tick(Duration::from_millis(100));
    }

    fn finished(&self) {
        self.bar.finish_and_clear();
    }
}

#[allow(clippy::too_many_arguments)]
pub fn execute(
    config: &Config,
    style: PathBuf,
    center: String,
    zoom: f64,
    bearing: f64,
    pitch: f64,
    out: PathBuf,
    page: Option<String>,
    orientation: Option<String>,
    width: Option<f64>,
    height: Option<f64>,
    unit: Option<String>,
    dpi: Option<u32>,
    format: Option<String>,
    title: Option<String>,
    subtitle: Option<String>,
    logo: Option<String>,
    access_token: Option<String>,
) -> Result<()> {
    log::info!("Starting map sheet export");
    log::info!("Style document: {}", style.display());
    log::info!("Output file: {}", out.display());

    if !style.exists() {
        return Err(anyhow!("Style file does not exist: {}", style.display()));
    }

    let style_json = std::fs::read_to_string(&style)
        .with_context(|| format!("Failed to read style file: {}", style.display()))?;
    let style_document =
        StyleDocument::parse(&style_json).context("Failed to parse style document")?;

    let center = parse_center(&center)?;
    let camera = Camera::new(center, zoom)
        .with_bearing(bearing)
        .with_pitch(pitch);

    let format = resolve_format(format.as_deref(), &out, config)?;
    log::info!("Output format: {}", format);

    let dpi = match dpi {
        Some(value) => Dpi::new(value)?,
        None => config.output.dpi,
    };

    let mut builder = ExportRequest::builder().dpi(dpi).format(format);
    builder = match (width, height) {
        (Some(width), Some(height)) => {
            let unit = match unit.as_deref() {
                Some(name) => Unit::from_str(name)?,
                None => Unit::default(),
            };
            builder.custom_size(width, height, unit)
        }
        (None, None) => {
            let size = match page.as_deref() {
                Some(name) => PageSize::from_str(name)
                    .map_err(|err| anyhow!("{} (see 'mapsheet pages')", err))?,
                None => config.page.size,
            };
            let orientation = match orientation.as_deref() {
                Some(name) => Orientation::from_str(name)?,
                None => config.page.orientation,
            };
            builder.page(size, orientation)
        }
        _ => {
            return Err(anyhow!(
                "Custom sizes need both --width and --height (or neither)"
            ))
        }
    };

    if let Some(title) = title {
        builder = builder.title(title);
    }
    if let Some(subtitle) = subtitle {
        builder = builder.subtitle(subtitle);
    }
    if let Some(logo) = logo.or_else(|| config.branding.logo.clone()) {
        builder = builder.logo(logo);
    }
    if let Some(token) = access_token.or_else(|| config.auth.access_token.clone()) {
        builder = builder.access_token(token);
    }
    let request = builder
        .logo_size(config.branding.logo_width, config.branding.logo_height)
        .build();

    let snapshot = MapSnapshot::new(style_document, camera);
    let sink = ExportSink::Save(out.clone());
    let progress = SpinnerProgress::new();

    let exporter = Exporter::software();
    exporter.generate_with_progress(&snapshot, &request, &sink, &progress)?;

    log::info!("Export complete: {}", out.display());
    Ok(())
}

/// Parse a `lng,lat` pair.
fn parse_center(input: &str) -> Result<LngLat> {
    let mut parts = input.split(',');
    let (lng, lat) = match (parts.next(), parts.next(), parts.next()) {
        (Some(lng), Some(lat), None) => (lng.trim(), lat.trim()),
        _ => return Err(anyhow!("Invalid center '{}': expected lng,lat", input)),
    };
    let lng: f64 = lng
        .parse()
        .with_context(|| format!("Invalid longitude: {}", lng))?;
    let lat: f64 = lat
        .parse()
        .with_context(|| format!("Invalid latitude: {}", lat))?;
    Ok(LngLat::new(lng, lat))
}

/// Explicit flag first, then the output extension, then the configured
/// fallback with a warning.
fn resolve_format(flag: Option<&str>, out: &Path, config: &Config) -> Result<OutputFormat> {
    if let Some(name) = flag {
        return Ok(OutputFormat::from_str(name)?);
    }
    match detect_format(out) {
        Some(found) => Ok(found),
        None => {
            log::warn!(
                "Could not infer a format from {}, using {}",
                out.display(),
                config.output.format
            );
            Ok(config.output.format)
        }
    }
}

fn detect_format(path: &Path) -> Option<OutputFormat> {
    let extension = path.extension()?;
    OutputFormat::from_str(&extension.to_string_lossy()).ok()
}
