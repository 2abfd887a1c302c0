use crate::state::{State, Tool};
use crate::{pages, widgets};

pub struct QrStampApp {
    state: State,
}

impl QrStampApp {
    /// Called once before the first frame.
    pub fn new(state: State) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }
}

impl eframe::App for QrStampApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.selectable_value(&mut self.state.tool, Tool::Placement, "Placement");
                ui.selectable_value(&mut self.state.tool, Tool::Batch, "Batch");
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            match self.state.tool {
                Tool::Placement => pages::placement_page(&mut self.state, ui),
                Tool::Batch => pages::batch_page(&mut self.state, ui),
            };
        });

        widgets::notice_modal(ctx, &mut self.state.notice);
    }
}
