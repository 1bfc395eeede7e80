//! JPEG encoding of the settled raster.

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::RgbaImage;

/// Fixed encode quality on the 1..=100 scale.
pub(crate) const JPEG_QUALITY: u8 = 85;

pub(crate) fn encode(raster: &RgbaImage) -> Result<Vec<u8>> {
    let flat = super::flatten_onto_white(raster);
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
    encoder
        .encode_image(&flat)
        .context("Failed to encode JPEG")?;
    Ok(bytes)
}
