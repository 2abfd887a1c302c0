//! Preview canvas where a primary-button drag selects the QR placement.
//!
//! One preview pixel is drawn as one UI point, so pointer offsets from the
//! canvas origin are preview coordinates.

use egui::{
    Color32, ColorImage, Context, Pos2, Rect, Response, Sense, Stroke, StrokeKind,
    TextureHandle, TextureOptions, Ui, Vec2, pos2,
};
use qrstamp_business::{PlacementRect, Preview, PreviewPoint, SelectionTracker};

use crate::utils::colors::SELECTION_STROKE;

const SELECTION_STROKE_WIDTH: f32 = 2.0;

/// Uploads a preview as a texture.
pub fn load_preview_texture(ctx: &Context, name: &str, preview: &Preview) -> TextureHandle {
    let rgba = preview.image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let image = ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
    ctx.load_texture(name, image, TextureOptions::LINEAR)
}

/// Draws the preview and feeds pointer input to `tracker`.
///
/// Returns the new placement when a drag is released this frame.
pub fn selection_canvas(
    ui: &mut Ui,
    texture: &TextureHandle,
    tracker: &mut SelectionTracker,
) -> (Response, Option<PlacementRect>) {
    let size = texture.size_vec2();
    let (rect, response) = ui.allocate_exact_size(size, Sense::drag());
    let to_preview = |pos: Pos2| PreviewPoint::new(pos.x - rect.min.x, pos.y - rect.min.y);

    if response.drag_started_by(egui::PointerButton::Primary)
        && let Some(origin) = ui.input(|i| i.pointer.press_origin())
    {
        tracker.press(to_preview(origin));
    }
    if response.dragged_by(egui::PointerButton::Primary)
        && let Some(pos) = response.interact_pointer_pos()
    {
        tracker.drag_to(to_preview(pos));
    }

    let mut committed = None;
    if response.drag_stopped_by(egui::PointerButton::Primary)
        && let Some(pos) = response
            .interact_pointer_pos()
            .or_else(|| ui.input(|i| i.pointer.latest_pos()))
    {
        committed = tracker.release(to_preview(pos));
    }

    let painter = ui.painter_at(rect);
    painter.image(
        texture.id(),
        rect,
        Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
        Color32::WHITE,
    );
    if let Some((min, max)) = tracker.preview_rect() {
        let selection = Rect::from_min_max(
            rect.min + Vec2::new(min.x, min.y),
            rect.min + Vec2::new(max.x, max.y),
        );
        painter.rect_stroke(
            selection,
            0.0,
            Stroke::new(SELECTION_STROKE_WIDTH, SELECTION_STROKE),
            StrokeKind::Inside,
        );
    }

    (response, committed)
}

/// Placeholder shown before any file is loaded.
pub fn empty_canvas(ui: &mut Ui, size: (u32, u32), hint: &str) -> Response {
    let size = Vec2::new(size.0 as f32, size.1 as f32);
    let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, Color32::from_gray(230));
    ui.put(rect, egui::Label::new(hint));
    response
}
