//! PNG encoding of the settled raster.

use anyhow::{Context, Result};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbaImage};

pub(crate) fn encode(raster: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(
            raster.as_raw(),
            raster.width(),
            raster.height(),
            ColorType::Rgba8,
        )
        .context("Failed to encode PNG")?;
    Ok(bytes)
}
