/*!
PDF sheet builder.

Produces a single-page document sized to the requested physical dimensions:
a centered title, the map image inside a 10mm margin, and a four-column
footer row holding the ground-scale string, the subtitle, the date, and an
optional logo. Layout positions below are measured from the top-left in
millimeters and converted to the PDF's bottom-left space at draw time.
*/

use std::io::{BufWriter, Cursor};

use anyhow::{Context, Result};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbImage, RgbaImage};
use mapsheet_core::{ground_scale_feet, ExportRequest, Unit, MM_PER_INCH};
use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfLayerReference, Point, Rgb,
};

use super::SheetInfo;
use crate::logo::load_logo;

const PT_PER_MM: f64 = 72.0 / 25.4;
const MM_PER_PT: f64 = 25.4 / 72.0;

/// Left/right page margin in mm.
const MARGIN: f64 = 10.0;
/// Title baseline, from the page top.
const TITLE_BASELINE: f64 = 15.0;
const TITLE_SIZE_PT: f64 = 13.0;
/// Extra baseline advance for wrapped title lines.
const TITLE_LEADING: f64 = 5.5;
/// Map image top edge, from the page top.
const IMAGE_TOP: f64 = 17.0;
/// Vertical space reserved around the map image (title above, footer below).
const IMAGE_RESERVE: f64 = 55.0;
/// Footer row top edge, from the page top.
const FOOTER_RESERVE: f64 = 35.0;
const CELL_HEIGHT: f64 = 25.0;
/// Cell text baseline below the row top.
const CELL_BASELINE: f64 = 14.0;
const CELL_SIZE_PT: f64 = 12.0;
const GRID_LINE_MM: f64 = 0.5;
/// Logo inset: fraction of the cell width, and mm below the row top.
const LOGO_X_FRACTION: f64 = 0.32;
const LOGO_Y_INSET: f64 = 2.0;
const PROVENANCE_SIZE_PT: f64 = 6.0;
/// Provenance baseline above the page bottom.
const PROVENANCE_RISE: f64 = 6.0;

const PDF_CREATOR: &str = "MapSheet Exporter";
const PDF_AUTHOR: &str = "MapSheet Development Team";

pub(crate) fn encode(
    raster: &RgbaImage,
    request: &ExportRequest,
    sheet: &SheetInfo,
) -> Result<Vec<u8>> {
    let page_w = to_mm(request.width, request.unit);
    let page_h = to_mm(request.height, request.unit);

    let doc_title = sheet
        .style_name
        .clone()
        .unwrap_or_else(|| "MapSheet Export".to_string());
    let (doc, page, layer) = PdfDocument::new(&doc_title, Mm(page_w), Mm(page_h), "Layer 1");
    let layer = doc.get_page(page).get_layer(layer);

    let helvetica = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .ok()
        .context("Failed to load built-in Helvetica")?;
    let helvetica_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .ok()
        .context("Failed to load built-in Helvetica-Bold")?;

    layer.set_fill_color(black());
    layer.set_outline_color(black());

    let title = request
        .title
        .clone()
        .or_else(|| sheet.style_name.clone())
        .unwrap_or_default();
    if !title.is_empty() {
        draw_title(&layer, &helvetica_bold, &title, page_w, page_h);
    }

    let image_w = page_w - 2.0 * MARGIN;
    let image_h = page_h - IMAGE_RESERVE;
    if image_w > 0.0 && image_h > 0.0 {
        let flat = super::flatten_onto_white(raster);
        place_rgb(&layer, flat, MARGIN, IMAGE_TOP, image_w, image_h, page_h)
            .context("Failed to embed map image")?;
    }

    if page_h > FOOTER_RESERVE && page_w > 2.0 * MARGIN {
        draw_footer(&layer, &helvetica_bold, request, sheet, page_w, page_h);
    }

    let provenance = format!(
        "center: [{}, {}], zoom: {} | {} | {}",
        sheet.camera.center.lng, sheet.camera.center.lat, sheet.camera.zoom, PDF_CREATOR, PDF_AUTHOR
    );
    layer.set_fill_color(gray());
    layer.use_text(
        provenance,
        PROVENANCE_SIZE_PT,
        Mm(MARGIN),
        Mm(PROVENANCE_RISE),
        &helvetica,
    );

    let mut bytes = Vec::new();
    doc.save(&mut BufWriter::new(&mut bytes))
        .ok()
        .context("Failed to serialize PDF")?;
    log::debug!("PDF sheet built: {}x{} mm, {} bytes", page_w, page_h, bytes.len());
    Ok(bytes)
}

fn to_mm(length: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Mm => length,
        Unit::In => length * MM_PER_INCH,
    }
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn gray() -> Color {
    Color::Rgb(Rgb::new(0.4, 0.4, 0.4, None))
}

fn draw_title(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    title: &str,
    page_w: f64,
    page_h: f64,
) {
    let max_width = page_w - 2.0 * MARGIN;
    let mut baseline = TITLE_BASELINE;
    for line in wrap_to_width(title, TITLE_SIZE_PT, max_width) {
        let width = estimate_text_width(&line, TITLE_SIZE_PT);
        let x = (MARGIN).max((page_w - width) / 2.0);
        layer.use_text(line, TITLE_SIZE_PT, Mm(x), Mm(page_h - baseline), font);
        baseline += TITLE_LEADING;
    }
}

fn draw_footer(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    request: &ExportRequest,
    sheet: &SheetInfo,
    page_w: f64,
    page_h: f64,
) {
    let row_top = page_h - FOOTER_RESERVE;
    let cell_w = (page_w - 2.0 * MARGIN) / 4.0;

    let scale_text = format!("1'' = {}", ground_scale_feet(sheet.camera.zoom));
    let date_text = chrono::Local::now().format("%d/%m/%Y").to_string();
    let subtitle = request.subtitle.clone().unwrap_or_default();
    let cells = [scale_text.as_str(), subtitle.as_str(), date_text.as_str(), ""];

    layer.set_outline_thickness(GRID_LINE_MM * PT_PER_MM);
    layer.set_fill_color(black());
    for (index, text) in cells.iter().enumerate() {
        let cell_x = MARGIN + index as f64 * cell_w;
        stroke_rect(layer, cell_x, row_top, cell_w, CELL_HEIGHT, page_h);
        if !text.is_empty() {
            let width = estimate_text_width(text, CELL_SIZE_PT);
            let x = cell_x + ((cell_w - width) / 2.0).max(1.0);
            layer.use_text(
                *text,
                CELL_SIZE_PT,
                Mm(x),
                Mm(page_h - row_top - CELL_BASELINE),
                font,
            );
        }
    }

    if let Some(source) = &request.logo {
        let placed = load_logo(source).and_then(|logo| {
            let (logo_w, logo_h) = request.logo_size;
            let logo_x = MARGIN + 3.0 * cell_w + LOGO_X_FRACTION * cell_w;
            let logo_top = row_top + LOGO_Y_INSET;
            place_rgb(
                layer,
                super::flatten_onto_white(&logo),
                logo_x,
                logo_top,
                logo_w,
                logo_h,
                page_h,
            )
        });
        // A missing logo should not sink the whole sheet.
        if let Err(err) = placed {
            log::warn!("Skipping footer logo: {:#}", err);
        }
    }
}

/// Embeds raw RGB pixels stretched into the given box, positions in mm from
/// the top-left.
fn place_rgb(
    layer: &PdfLayerReference,
    rgb: RgbImage,
    x: f64,
    top: f64,
    width_mm: f64,
    height_mm: f64,
    page_h: f64,
) -> Result<()> {
    let (px_w, px_h) = rgb.dimensions();
    if px_w == 0 || px_h == 0 || width_mm <= 0.0 || height_mm <= 0.0 {
        return Ok(());
    }
    let mut staged = Vec::new();
    PngEncoder::new(&mut staged)
        .write_image(rgb.as_raw(), px_w, px_h, ColorType::Rgb8)
        .context("Failed to stage image for embedding")?;
    let decoder = PngDecoder::new(Cursor::new(staged.as_slice()))
        .context("Failed to reopen staged image")?;
    let image = Image::try_from(decoder).context("Failed to embed image")?;

    // dpi maps the pixel width onto width_mm exactly; scale_y stretches the
    // height independently, so the box wins over the raster aspect ratio.
    let dpi = px_w as f64 * MM_PER_INCH / width_mm;
    let natural_h = px_h as f64 * MM_PER_INCH / dpi;
    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x)),
            translate_y: Some(Mm(page_h - top - height_mm)),
            dpi: Some(dpi),
            scale_y: Some(height_mm / natural_h),
            ..Default::default()
        },
    );
    Ok(())
}

fn stroke_rect(layer: &PdfLayerReference, x: f64, top: f64, w: f64, h: f64, page_h: f64) {
    let bottom = page_h - top - h;
    let outline = Line {
        points: vec![
            (Point::new(Mm(x), Mm(bottom)), false),
            (Point::new(Mm(x + w), Mm(bottom)), false),
            (Point::new(Mm(x + w), Mm(bottom + h)), false),
            (Point::new(Mm(x), Mm(bottom + h)), false),
        ],
        is_closed: true,
    };
    layer.add_line(outline);
}

/// Width estimate for built-in Helvetica at the given size. The built-in
/// fonts expose no metrics, so this uses an average glyph advance of half
/// an em; good enough for centering and wrapping.
fn estimate_text_width(text: &str, size_pt: f64) -> f64 {
    text.chars().count() as f64 * size_pt * 0.5 * MM_PER_PT
}

/// Greedy word wrap against the width estimate. A single word wider than
/// the limit gets its own line rather than being split.
fn wrap_to_width(text: &str, size_pt: f64, max_mm: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if estimate_text_width(&candidate, size_pt) <= max_mm || current.is_empty() {
            current = candidate;
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapsheet_core::{Camera, Dpi, LngLat, Orientation, OutputFormat, PageSize};

    fn small_request() -> ExportRequest {
        ExportRequest::builder()
            .page(PageSize::A6, Orientation::Landscape)
            .dpi(Dpi::new(72).unwrap())
            .format(OutputFormat::Pdf)
            .title("Harbor Districts")
            .subtitle("Northern Approach")
            .build()
    }

    fn sheet() -> SheetInfo {
        SheetInfo {
            style_name: Some("Harbor Base".to_string()),
            camera: Camera::new(LngLat::new(24.9384, 60.1699), 10.0),
        }
    }

    #[test]
    fn test_wrap_keeps_short_title_on_one_line() {
        let lines = wrap_to_width("Harbor Districts", 13.0, 128.0);
        assert_eq!(lines, vec!["Harbor Districts".to_string()]);
    }

    #[test]
    fn test_wrap_splits_on_words_within_limit() {
        let lines = wrap_to_width(
            "A very long map sheet title that cannot possibly fit one narrow line",
            13.0,
            60.0,
        );
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(
                estimate_text_width(line, 13.0) <= 60.0 || !line.contains(' '),
                "line too wide: {}",
                line
            );
        }
    }

    #[test]
    fn test_estimate_scales_with_size() {
        let narrow = estimate_text_width("abc", 6.0);
        let wide = estimate_text_width("abc", 12.0);
        assert!(narrow > 0.0);
        assert!((wide - 2.0 * narrow).abs() < 1e-9);
    }

    #[test]
    fn test_encode_produces_pdf_with_sheet_strings() {
        let request = small_request();
        let (w, h) = request.device_size();
        let raster = RgbaImage::from_pixel(w, h, image::Rgba([240, 240, 240, 255]));
        let bytes = encode(&raster, &request, &sheet()).unwrap();

        assert_eq!(&bytes[..5], b"%PDF-");
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("Harbor Districts"));
        assert!(text.contains("Northern Approach"));
        assert!(text.contains("1'' = 24075"));
        assert!(text.contains("MapSheet Exporter"));
    }
}
