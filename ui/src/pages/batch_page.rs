//! Batch tool: one combined PDF from a template and a CSV roster.

use egui::{Response, Ui};
use qrstamp_business::BatchStage;

use crate::state::State;
use crate::widgets::{self, Notice};

pub fn batch_page(state: &mut State, ui: &mut Ui) -> Response {
    ui.vertical(|ui| {
        ui.heading("QR Code PDF Generator");
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            if ui.button("Load PDF Template").clicked() {
                load_template(state);
            }
            if ui.button("Load CSV File").clicked() {
                load_roster(state);
            }
            if ui.button("Generate QR PDF").clicked() {
                generate(state);
            }
        });

        status_lines(state, ui);

        if let Some(roster) = state.batch.session.roster() {
            ui.add_space(4.0);
            widgets::roster_table(ui, roster);
        }
        ui.add_space(8.0);

        canvas(state, ui);
    })
    .response
}

fn status_lines(state: &State, ui: &mut Ui) {
    let session = &state.batch.session;
    match session.template() {
        Some(template) => ui.label(format!("Template: {}", template.file_name())),
        None => ui.label("No template loaded"),
    };
    if let Some(roster) = session.roster() {
        ui.label(format!(
            "Roster: {} row(s), {} page(s)",
            roster.len(),
            roster.total_pages()
        ));
    }
    match session.placement() {
        Some(rect) => ui.label(format!("QR position: {rect}")),
        None => ui.label("QR position: drag on the preview"),
    };
    if session.stage() == BatchStage::Generated
        && let Some(output) = session.last_output()
    {
        ui.label(format!("Last output: {}", output.path.display()));
    }
}

fn canvas(state: &mut State, ui: &mut Ui) {
    let page = &mut state.batch;
    let Some(preview) = page.session.preview() else {
        widgets::empty_canvas(
            ui,
            page.session.config().preview_max,
            "Load a PDF template to start",
        );
        return;
    };

    let texture = page
        .texture
        .get_or_insert_with(|| {
            widgets::load_preview_texture(ui.ctx(), "batch_preview", preview)
        })
        .clone();
    widgets::selection_canvas(ui, &texture, page.session.tracker_mut());
}

fn load_template(state: &mut State) {
    let Some(path) = state.picker.pick_template() else {
        return;
    };
    state.notice = Some(
        match state
            .batch
            .session
            .load_template(&path, state.rasterizer.as_ref())
        {
            Ok(()) => {
                state.batch.texture = None;
                Notice::success(format!("Loaded PDF: {}", path.display()))
            }
            Err(e) => Notice::from(&e),
        },
    );
}

fn load_roster(state: &mut State) {
    let Some(path) = state.picker.pick_roster() else {
        return;
    };
    state.notice = Some(match state.batch.session.load_roster(&path) {
        Ok(roster) => {
            log::info!("Roster has {} row(s)", roster.len());
            Notice::success(format!("Loaded CSV: {}", path.display()))
        }
        Err(e) => {
            log::warn!("{e}");
            Notice::error(format!("Failed to load CSV: {e}"))
        }
    });
}

fn generate(state: &mut State) {
    if let Err(e) = state.batch.session.check_ready() {
        state.notice = Some(Notice::from(&e));
        return;
    }
    let Some(output) = state.picker.save_pdf() else {
        return;
    };

    state.notice = Some(match state.batch.session.generate(&output) {
        Ok(result) => Notice::success(format!("QR PDF Generated: {}", result.path.display())),
        Err(e) => Notice::from(&e),
    });
}
