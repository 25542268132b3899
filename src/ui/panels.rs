use eframe::egui::{self, Color32, RichText, ScrollArea, TextEdit, Ui};

use crate::data::loader::DataSource;
use crate::data::panel::ControlKind;
use crate::state::AppState;

/// Label of the "no constraint" entry in every choice list.
const ALL_LABEL: &str = "全部";

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("筛选");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("未加载数据。");
        return;
    }

    // Columns whose control changed this frame; applied after the loop so the
    // panel is not borrowed while the filters are rebuilt.
    let mut changed: Vec<String> = Vec::new();
    let mut reset = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for control in &mut state.panel.controls {
                let column = control.column.clone();
                ui.strong(&column);

                match &mut control.kind {
                    ControlKind::Choice { options, selected } => {
                        let current = selected
                            .and_then(|i| options.get(i))
                            .map(|v| v.to_string())
                            .unwrap_or_else(|| ALL_LABEL.to_string());

                        egui::ComboBox::from_id_salt(("filter", column.as_str()))
                            .selected_text(current)
                            .width(ui.available_width())
                            .show_ui(ui, |ui: &mut Ui| {
                                if ui.selectable_value(selected, None, ALL_LABEL).clicked() {
                                    changed.push(column.clone());
                                }
                                for (i, value) in options.iter().enumerate() {
                                    if ui
                                        .selectable_value(selected, Some(i), value.to_string())
                                        .clicked()
                                    {
                                        changed.push(column.clone());
                                    }
                                }
                            });
                    }
                    ControlKind::Range { min_text, max_text } => {
                        ui.horizontal(|ui: &mut Ui| {
                            let min = ui.add(
                                TextEdit::singleline(min_text)
                                    .hint_text("最低分")
                                    .desired_width(80.0),
                            );
                            let max = ui.add(
                                TextEdit::singleline(max_text)
                                    .hint_text("最高分")
                                    .desired_width(80.0),
                            );
                            if min.changed() || max.changed() {
                                changed.push(column.clone());
                            }
                        });
                    }
                }
                ui.add_space(6.0);
            }

            ui.separator();
            if ui.button("重置筛选").clicked() {
                reset = true;
            }
        });

    for column in changed {
        state.control_changed(&column);
    }
    if reset {
        state.reset_filters();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar: year selector, search box and counts.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("文件", |ui: &mut Ui| {
            if ui.button("打开数据目录…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label("年份");
        let current = state.year.clone().unwrap_or_default();
        let mut picked: Option<String> = None;
        egui::ComboBox::from_id_salt("year_select")
            .selected_text(&current)
            .show_ui(ui, |ui: &mut Ui| {
                for year in &state.years {
                    if ui.selectable_label(current == *year, year).clicked() {
                        picked = Some(year.clone());
                    }
                }
            });
        if let Some(year) = picked {
            if year != current {
                state.select_year(&year);
            }
        }

        if state.caps.search {
            ui.separator();
            let mut term = state.search.clone();
            let resp = ui.add(
                TextEdit::singleline(&mut term)
                    .hint_text(format!("搜索{}…", state.config.name_column))
                    .desired_width(200.0),
            );
            if resp.changed() {
                state.set_search(&term);
            }
        }

        ui.separator();

        if state.dataset.is_some() {
            ui.label(format!(
                "{} / {} 条",
                state.visible_indices.len(),
                state.total_rows()
            ));
        }

        if state.loading {
            ui.spinner();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Info strip – score lines and source link
// ---------------------------------------------------------------------------

/// Render the score lines for the selected year. Shows nothing for years
/// without reference data.
pub fn info_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for line in state.info.lines() {
            ui.label(RichText::new(line).strong());
            ui.add_space(12.0);
        }
        if let Some(url) = state.info.source_link {
            ui.hyperlink_to("查看原始数据", url);
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("打开数据目录")
        .pick_folder();

    if let Some(path) = folder {
        log::info!("Switching data directory to {}", path.display());
        state.set_source(DataSource::Directory(path));
    }
}
