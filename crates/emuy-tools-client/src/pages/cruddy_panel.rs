use egui_extras::{Column, TableBuilder};
use emuy_client_core::Client;
use emuy_shared::{
    attendance::{filter_records, AttendanceRecord, AttendanceStats, LeaderboardEntry, RecordId},
    routes::Route,
};
use record_editor::{RecordEditor, TIME_FORMAT};
use strum::IntoEnumIterator as _;
use tracing::info;

use super::{
    resource::{AwaitingType, Resource},
    DisplayablePage,
};
use crate::{
    app::wake_fn,
    displayable_page_common,
    ui_helpers::{get_text_height, ui_card, ui_empty_state, ui_escape_button},
};

mod record_editor;

#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UiCruddyPanel {
    is_open: bool,
    page_unique_number: usize,
    tab: CruddyTab,
    filter: String,
    #[serde(skip)]
    records: Resource<Vec<AttendanceRecord>>,
    #[serde(skip)]
    leaderboard: Resource<Vec<LeaderboardEntry>>,
    #[serde(skip)]
    editor: Option<RecordEditor>,
    #[serde(skip)]
    editor_error: Option<String>,
    #[serde(skip)]
    save: Resource<AttendanceRecord>,
    /// Asked to confirm before the request is sent
    #[serde(skip)]
    delete_candidate: Option<RecordId>,
    #[serde(skip)]
    delete: Resource<()>,
}

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    strum::EnumIter,
    strum::Display,
)]
enum CruddyTab {
    #[default]
    Records,
    Leaderboard,
}

impl DisplayablePage for UiCruddyPanel {
    displayable_page_common!("Cruddy Panel", Route::CruddyPanel);

    fn reset_to_default(&mut self, _: super::private::Token) {
        *self = Self {
            is_open: self.is_open,
            page_unique_number: self.page_unique_number,
            tab: self.tab,
            filter: std::mem::take(&mut self.filter),
            ..Default::default()
        };
    }

    fn show(&mut self, ui: &mut eframe::egui::Ui, data_shared: &mut crate::DataShared) {
        let client = &data_shared.client;
        ui.horizontal(|ui| {
            for tab in CruddyTab::iter() {
                ui.selectable_value(&mut self.tab, tab, tab.to_string());
            }
            ui.separator();
            if ui.button("Refresh").clicked() {
                match self.tab {
                    CruddyTab::Records => self.records.reset(),
                    CruddyTab::Leaderboard => self.leaderboard.reset(),
                }
            }
        });
        ui.separator();

        match self.tab {
            CruddyTab::Records => self.ui_records_tab(ui, client),
            CruddyTab::Leaderboard => self.ui_leaderboard_tab(ui, client),
        }
    }
}

impl UiCruddyPanel {
    fn ui_records_tab(&mut self, ui: &mut egui::Ui, client: &Client) {
        if let Some(saved) = self.save.ui_operation(ui, "Saving record...") {
            info!(id = saved.id, "attendance record saved");
            self.editor = None;
            self.records.reset();
            // Counts changed as well
            self.leaderboard.reset();
        }
        if self.delete.ui_operation(ui, "Deleting record...").is_some() {
            self.records.reset();
            self.leaderboard.reset();
        }
        self.ui_editor(ui, client);
        self.ui_delete_confirmation(ui, client);

        let ctx = ui.ctx().clone();
        let Some(records) = self
            .records
            .ui_get(ui, None, || AwaitingType(client.list_records(wake_fn(ctx))))
        else {
            return;
        };

        ui_card(ui, "Totals", |ui| {
            ui_stats(ui, &AttendanceStats::from_records(records));
        });

        ui.horizontal(|ui| {
            ui.label("Filter");
            ui.text_edit_singleline(&mut self.filter)
                .on_hover_text("Matches name or event");
            if !self.filter.is_empty() && ui.button("Clear").clicked() {
                self.filter.clear();
            }
            ui.separator();
            if ui
                .add_enabled(self.editor.is_none(), egui::Button::new("New Record"))
                .clicked()
            {
                self.editor = Some(RecordEditor::new_record());
                self.editor_error = None;
            }
        });

        if records.is_empty() {
            ui_empty_state(ui, "No attendance records yet");
            return;
        }
        let shown = filter_records(records, &self.filter);
        if shown.is_empty() {
            ui_empty_state(ui, "No records match the filter");
            return;
        }

        let is_busy = self.save.is_loading() || self.delete.is_loading();
        let mut edit_clicked = None;
        let mut delete_clicked = None;
        let text_height = get_text_height(ui);
        TableBuilder::new(ui)
            .id_salt("attendance records table")
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::auto())
            .column(Column::auto().at_least(120.0))
            .column(Column::auto().at_least(120.0))
            .column(Column::auto())
            .column(Column::remainder())
            .header(text_height, |mut header| {
                for title in ["Id", "Name", "Event", "Time", ""] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for record in shown {
                    body.row(text_height, |mut row| {
                        row.col(|ui| {
                            ui.label(record.id.to_string());
                        });
                        row.col(|ui| {
                            ui.label(&record.name);
                        });
                        row.col(|ui| {
                            ui.label(&record.event);
                        });
                        row.col(|ui| {
                            match record.time {
                                Some(time) => ui.label(time.format(TIME_FORMAT).to_string()),
                                None => ui.weak("-"),
                            };
                        });
                        row.col(|ui| {
                            ui.add_enabled_ui(!is_busy, |ui| {
                                if ui.button("Edit").clicked() {
                                    edit_clicked = Some(record.clone());
                                }
                                if ui.button("Delete").clicked() {
                                    delete_clicked = Some(record.id);
                                }
                            });
                        });
                    });
                }
            });

        if let Some(record) = edit_clicked {
            self.editor = Some(RecordEditor::edit(&record));
            self.editor_error = None;
        }
        if let Some(id) = delete_clicked {
            self.delete_candidate = Some(id);
        }
    }

    fn ui_editor(&mut self, ui: &mut egui::Ui, client: &Client) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        let mut should_close = false;
        ui_card(ui, &editor.heading(), |ui| {
            egui::Grid::new("record editor grid")
                .num_columns(2)
                .show(ui, |ui| {
                    ui.label("Name");
                    ui.text_edit_singleline(&mut editor.name);
                    ui.end_row();

                    ui.label("Event");
                    ui.text_edit_singleline(&mut editor.event);
                    ui.end_row();

                    ui.label("Time (UTC)");
                    ui.add(egui::TextEdit::singleline(&mut editor.time).hint_text(TIME_FORMAT));
                    ui.end_row();
                });
            if let Some(err) = &self.editor_error {
                ui.colored_label(ui.visuals().error_fg_color, err);
            }
            ui.horizontal(|ui| {
                let is_saving = self.save.is_loading();
                if ui
                    .add_enabled(!is_saving, egui::Button::new("Save"))
                    .clicked()
                {
                    match editor.to_draft() {
                        Ok(draft) => {
                            self.editor_error = None;
                            let notify = wake_fn(ui.ctx().clone());
                            let rx = match editor.editing {
                                Some(id) => client.update_record(id, &draft, notify),
                                None => client.create_record(&draft, notify),
                            };
                            self.save.start(rx);
                        }
                        Err(msg) => self.editor_error = Some(msg),
                    }
                }
                if ui_escape_button(ui, "Cancel") {
                    should_close = true;
                }
            });
        });
        if should_close {
            self.editor = None;
            self.editor_error = None;
        }
    }

    fn ui_delete_confirmation(&mut self, ui: &mut egui::Ui, client: &Client) {
        let Some(id) = self.delete_candidate else {
            return;
        };
        ui.horizontal(|ui| {
            ui.label(format!("Delete record {id}?"));
            if ui.button("Delete").clicked() {
                self.delete
                    .start(client.delete_record(id, wake_fn(ui.ctx().clone())));
                self.delete_candidate = None;
            }
            if ui_escape_button(ui, "Keep") {
                self.delete_candidate = None;
            }
        });
    }

    fn ui_leaderboard_tab(&mut self, ui: &mut egui::Ui, client: &Client) {
        let ctx = ui.ctx().clone();
        let Some(entries) = self
            .leaderboard
            .ui_get(ui, None, || AwaitingType(client.leaderboard(wake_fn(ctx))))
        else {
            return;
        };
        if entries.is_empty() {
            ui_empty_state(ui, "Nobody has attended anything yet");
            return;
        }
        egui::Grid::new("leaderboard grid")
            .num_columns(3)
            .striped(true)
            .show(ui, |ui| {
                ui.strong("Rank");
                ui.strong("Name");
                ui.strong("Attended");
                ui.end_row();
                for entry in entries.iter() {
                    ui.label(entry.rank.to_string());
                    ui.label(&entry.name);
                    ui.label(entry.count.to_string());
                    ui.end_row();
                }
            });
    }
}

fn ui_stats(ui: &mut egui::Ui, stats: &AttendanceStats) {
    ui.horizontal(|ui| {
        ui.label(format!("{} records", stats.total));
        ui.separator();
        ui.label(format!("{} people", stats.unique_names));
        ui.separator();
        ui.label(format!("{} events", stats.unique_events));
    });
}
