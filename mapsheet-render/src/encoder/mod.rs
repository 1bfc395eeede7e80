/*!
Output format encoders.

One entry point, [`encode`], dispatches the settled raster to the encoder
for the requested format. PNG and JPEG are always compiled in; the PDF
sheet builder sits behind the `printpdf` feature and the experimental SVG
path behind `vector-export`. Disabled formats fail inside the dispatch with
an error the pipeline logs, so the cleanup path downstream of the encoder
runs either way.
*/

use anyhow::Result;
use image::{RgbImage, RgbaImage};
use mapsheet_core::{Camera, ExportRequest, OutputFormat};

pub(crate) mod jpeg;
#[cfg(feature = "printpdf")]
pub(crate) mod pdf;
pub(crate) mod png;
#[cfg(feature = "vector-export")]
pub(crate) mod svg;

/// Sheet-level context for document formats.
#[derive(Debug, Clone)]
pub struct SheetInfo {
    /// Display name of the source style; becomes the PDF document title.
    pub style_name: Option<String>,
    /// Camera at generate time; drives the footer scale string and the
    /// provenance metadata.
    pub camera: Camera,
}

/// Encodes the settled raster in the requested format.
pub fn encode(raster: &RgbaImage, request: &ExportRequest, sheet: &SheetInfo) -> Result<Vec<u8>> {
    match request.format {
        OutputFormat::Png => png::encode(raster),
        OutputFormat::Jpeg => jpeg::encode(raster),
        OutputFormat::Pdf => encode_pdf(raster, request, sheet),
        OutputFormat::Svg => encode_svg(raster, request),
    }
}

#[cfg(feature = "printpdf")]
fn encode_pdf(raster: &RgbaImage, request: &ExportRequest, sheet: &SheetInfo) -> Result<Vec<u8>> {
    pdf::encode(raster, request, sheet)
}

#[cfg(not(feature = "printpdf"))]
fn encode_pdf(
    _raster: &RgbaImage,
    _request: &ExportRequest,
    _sheet: &SheetInfo,
) -> Result<Vec<u8>> {
    Err(anyhow::anyhow!(
        "PDF export not enabled (compile with 'printpdf' feature)"
    ))
}

#[cfg(feature = "vector-export")]
fn encode_svg(raster: &RgbaImage, request: &ExportRequest) -> Result<Vec<u8>> {
    svg::encode(raster, request)
}

#[cfg(not(feature = "vector-export"))]
fn encode_svg(_raster: &RgbaImage, _request: &ExportRequest) -> Result<Vec<u8>> {
    Err(anyhow::anyhow!(
        "SVG export not enabled (compile with 'vector-export' feature)"
    ))
}

/// Composites RGBA pixels onto an opaque white background. JPEG has no
/// alpha channel and PDF image objects here are raw RGB.
pub(crate) fn flatten_onto_white(raster: &RgbaImage) -> RgbImage {
    let mut flat = RgbImage::new(raster.width(), raster.height());
    for (src, dst) in raster.pixels().zip(flat.pixels_mut()) {
        let alpha = src[3] as u32;
        for channel in 0..3 {
            dst[channel] = ((src[channel] as u32 * alpha + 255 * (255 - alpha)) / 255) as u8;
        }
    }
    flat
}
