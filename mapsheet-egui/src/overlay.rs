//! Map-view overlays drawn while the export panel is open.
//!
//! Two overlays mirror what the printed sheet will show: a centre crosshair
//! and a printable-area rectangle with the selected page's aspect ratio,
//! dimming everything that will fall outside the sheet.

use egui::{pos2, vec2, Color32, Painter, Rect, Stroke};

/// Preferred gap between the view edge and the printable-area rectangle,
/// in ui points. Shrinks on small views so the rectangle stays well formed.
const AREA_MARGIN: f32 = 50.0;

const CROSSHAIR_STROKE_WIDTH: f32 = 1.0;
const AREA_STROKE_WIDTH: f32 = 1.0;

/// Largest centred rectangle with the page's aspect ratio that fits the
/// view with [`AREA_MARGIN`] clearance.
pub fn printable_area_rect(view: Rect, page_mm: (f64, f64)) -> Rect {
    let (page_w, page_h) = page_mm;
    if page_w <= 0.0 || page_h <= 0.0 || view.width() <= 0.0 || view.height() <= 0.0 {
        return Rect::from_center_size(view.center(), vec2(0.0, 0.0));
    }
    let aspect = (page_w / page_h) as f32;

    let margin = AREA_MARGIN
        .min(view.width() * 0.25)
        .min(view.height() * 0.25);
    let available_w = view.width() - 2.0 * margin;
    let available_h = view.height() - 2.0 * margin;

    let (w, h) = if available_w / available_h > aspect {
        (available_h * aspect, available_h)
    } else {
        (available_w, available_w / aspect)
    };
    Rect::from_center_size(view.center(), vec2(w, h))
}

/// Full-width and full-height lines through the view centre.
pub fn draw_crosshair(painter: &Painter, view: Rect) {
    let stroke = Stroke::new(CROSSHAIR_STROKE_WIDTH, Color32::from_gray(64));
    let center = view.center();
    painter.line_segment(
        [pos2(view.min.x, center.y), pos2(view.max.x, center.y)],
        stroke,
    );
    painter.line_segment(
        [pos2(center.x, view.min.y), pos2(center.x, view.max.y)],
        stroke,
    );
}

/// Dim the view outside the printable area and stroke its outline.
pub fn draw_printable_area(painter: &Painter, view: Rect, page_mm: (f64, f64)) {
    let area = printable_area_rect(view, page_mm);
    let dim = Color32::from_black_alpha(96);

    painter.rect_filled(
        Rect::from_min_max(view.min, pos2(view.max.x, area.min.y)),
        0.0,
        dim,
    );
    painter.rect_filled(
        Rect::from_min_max(pos2(view.min.x, area.max.y), view.max),
        0.0,
        dim,
    );
    painter.rect_filled(
        Rect::from_min_max(pos2(view.min.x, area.min.y), pos2(area.min.x, area.max.y)),
        0.0,
        dim,
    );
    painter.rect_filled(
        Rect::from_min_max(pos2(area.max.x, area.min.y), pos2(view.max.x, area.max.y)),
        0.0,
        dim,
    );
    painter.rect_stroke(
        area,
        0.0,
        Stroke::new(AREA_STROKE_WIDTH, Color32::from_gray(230)),
    );
}
