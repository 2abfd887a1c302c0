//! Read-only table of the loaded roster.

use egui::Ui;
use egui_extras::{Column, TableBuilder};
use qrstamp_business::Roster;
use qrstamp_business::roster::{AMOUNT_COLUMN, LINK_COLUMN, NAME_COLUMN};

const ROW_HEIGHT: f32 = 18.0;
const HEADER_HEIGHT: f32 = 20.0;
const MAX_HEIGHT: f32 = 160.0;

const NAME_WIDTH: f32 = 140.0;
const AMOUNT_WIDTH: f32 = 60.0;

pub fn roster_table(ui: &mut Ui, roster: &Roster) {
    let rows = roster.rows();

    TableBuilder::new(ui)
        .id_salt("roster_table")
        .striped(true)
        .max_scroll_height(MAX_HEIGHT)
        .column(Column::remainder().at_least(200.0).clip(true))
        .column(Column::exact(NAME_WIDTH).clip(true))
        .column(Column::exact(AMOUNT_WIDTH))
        .header(HEADER_HEIGHT, |mut header| {
            for label in [LINK_COLUMN, NAME_COLUMN, AMOUNT_COLUMN] {
                header.col(|ui| {
                    ui.strong(label);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let entry = &rows[row.index()];
                row.col(|ui| {
                    ui.label(&entry.link);
                });
                row.col(|ui| {
                    ui.label(&entry.name);
                });
                row.col(|ui| {
                    ui.label(entry.amount.to_string());
                });
            });
        });
}
