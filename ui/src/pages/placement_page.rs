//! Placement tool: stamp one QR code per link onto an image or PDF.

use egui::{Response, Ui};
use qrstamp_business::SurfaceKind;

use crate::state::State;
use crate::widgets::{self, Notice};

pub fn placement_page(state: &mut State, ui: &mut Ui) -> Response {
    ui.vertical(|ui| {
        ui.heading("QR Code Placement Tool");
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            if ui.button("Load Image/PDF").clicked() {
                load_source(state);
            }
            if ui.button("Generate QR Codes").clicked() {
                generate(state);
            }
        });

        status_lines(state, ui);

        let limit = state.placement.session.config().payload_line_limit;
        ui.label(format!("Links (one per line, up to {limit}):"));
        ui.add(
            egui::TextEdit::multiline(&mut state.placement.payload_text)
                .desired_rows(4)
                .desired_width(f32::INFINITY)
                .hint_text("https://example.com"),
        );
        ui.add_space(8.0);

        canvas(state, ui);
    })
    .response
}

fn status_lines(state: &State, ui: &mut Ui) {
    let session = &state.placement.session;
    match session.source() {
        Some(source) => {
            let (w, h) = source.dimensions();
            let kind = match source.kind() {
                SurfaceKind::Raster => "image",
                SurfaceKind::Document => "PDF",
            };
            ui.label(format!("Loaded {kind}: {} ({w}x{h})", source.file_name()));
        }
        None => {
            ui.label("No file loaded");
        }
    }
    match session.placement() {
        Some(rect) => ui.label(format!("QR position: {rect}")),
        None => ui.label("QR position: drag on the preview"),
    };
}

fn canvas(state: &mut State, ui: &mut Ui) {
    let page = &mut state.placement;
    let Some(preview) = page.session.preview() else {
        widgets::empty_canvas(
            ui,
            page.session.config().preview_max,
            "Load an image or PDF to start",
        );
        return;
    };

    let texture = page
        .texture
        .get_or_insert_with(|| {
            widgets::load_preview_texture(ui.ctx(), "placement_preview", preview)
        })
        .clone();
    widgets::selection_canvas(ui, &texture, page.session.tracker_mut());
}

fn load_source(state: &mut State) {
    let Some(path) = state.picker.pick_source() else {
        return;
    };
    match state
        .placement
        .session
        .load_source(&path, state.rasterizer.as_ref())
    {
        Ok(()) => state.placement.texture = None,
        Err(e) => state.notice = Some(Notice::from(&e)),
    }
}

fn generate(state: &mut State) {
    let page = &state.placement;
    state.notice = Some(match page.session.generate(&page.payload_text) {
        Ok(written) => {
            log::info!("Generated {} file(s)", written.len());
            Notice::success("QR codes have been generated and saved!")
        }
        Err(e) => Notice::from(&e),
    });
}
