//! Experimental SVG encoding.
//!
//! Not a vector decomposition of the map: the settled raster is PNG-encoded,
//! base64-embedded as a `data:` URI, and wrapped in a single `<image>`
//! element. Pixel dimensions come from the physical page size converted with
//! the export DPI as the factor, matching the raster.

use std::fmt::Write;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::RgbaImage;
use mapsheet_core::ExportRequest;

pub(crate) fn encode(raster: &RgbaImage, request: &ExportRequest) -> Result<Vec<u8>> {
    let (width, height) = request.device_size();
    let png = super::png::encode(raster)?;
    let data_uri = format!("data:image/png;base64,{}", STANDARD.encode(&png));

    let mut document = String::new();
    writeln!(document, r#"<?xml version="1.0" encoding="UTF-8"?>"#)
        .context("Failed to serialize SVG")?;
    writeln!(
        document,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" version="1.1" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        width, height, width, height
    )
    .context("Failed to serialize SVG")?;
    writeln!(
        document,
        r#"  <image width="{}" height="{}" xlink:href="{}"/>"#,
        width, height, data_uri
    )
    .context("Failed to serialize SVG")?;
    writeln!(document, "</svg>").context("Failed to serialize SVG")?;

    Ok(document.into_bytes())
}
