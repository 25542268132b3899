use eframe::egui::{Align, Color32, Layout, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::table::TableBody;
use crate::state::AppState;

const HEADER_HEIGHT: f32 = 24.0;
const ROW_HEIGHT: f32 = 20.0;

// ---------------------------------------------------------------------------
// Results table (central panel)
// ---------------------------------------------------------------------------

/// Draw the rendered table. Only reads state: all filtering already happened
/// in [`AppState::refilter`].
pub fn results_table(ui: &mut Ui, state: &AppState) {
    let table = &state.table;

    match &table.body {
        TableBody::Message(msg) => message_row(ui, msg),
        TableBody::Rows(_) if table.header.is_empty() => {
            ui.centered_and_justified(|ui: &mut Ui| {
                if state.loading {
                    ui.spinner();
                } else {
                    ui.heading("请选择年份以查看投档线");
                }
            });
        }
        TableBody::Rows(rows) => {
            let ncols = table.header.len();
            let mut builder = TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .cell_layout(Layout::left_to_right(Align::Center))
                .min_scrolled_height(0.0);
            for ci in 0..ncols {
                let col = if ci + 1 == ncols {
                    Column::remainder().at_least(60.0).clip(true)
                } else {
                    Column::auto().at_least(60.0).clip(true)
                };
                builder = builder.column(col);
            }

            builder
                .header(HEADER_HEIGHT, |mut header| {
                    for name in &table.header {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                        let Some(cells) = rows.get(row.index()) else {
                            return;
                        };
                        for cell in cells {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell);
                            });
                        }
                    });
                });
        }
    }
}

/// A single row spanning the full width, header left empty.
fn message_row(ui: &mut Ui, msg: &str) {
    TableBuilder::new(ui)
        .column(Column::remainder())
        .body(|mut body| {
            body.row(ROW_HEIGHT, |mut row| {
                row.col(|ui: &mut Ui| {
                    ui.label(RichText::new(msg).color(Color32::RED));
                });
            });
        });
}
