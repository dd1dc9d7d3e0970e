use emuy_client_core::Client;
use emuy_shared::calendar_sync::{SyncConfig, SyncReport, SyncStatus};

use super::ui_timestamp_label;
use crate::{
    app::wake_fn,
    pages::resource::{AwaitingType, Resource},
    ui_helpers::{ui_badge, ui_card},
};

#[derive(Debug, Default)]
pub struct CalendarSyncPanel {
    status: Resource<SyncStatus>,
    config: Resource<SyncConfig>,
    trigger: Resource<SyncReport>,
    last_report: Option<SyncReport>,
}

impl CalendarSyncPanel {
    pub fn ui(&mut self, ui: &mut egui::Ui, client: &Client) {
        ui.horizontal(|ui| {
            if ui.button("Reload").clicked() {
                self.status.reset();
                self.config.reset();
            }
            if ui
                .add_enabled(!self.trigger.is_loading(), egui::Button::new("Sync Now"))
                .clicked()
            {
                self.last_report = None;
                self.trigger
                    .start(client.trigger_sync(wake_fn(ui.ctx().clone())));
            }
        });
        if let Some(report) = self.trigger.ui_operation(ui, "Syncing...") {
            self.last_report = Some(report);
            self.status.reset();
        }
        if let Some(report) = &self.last_report {
            ui_report(ui, report);
        }
        ui.separator();

        ui.horizontal_wrapped(|ui| {
            ui_card(ui, "Status", |ui| {
                let ctx = ui.ctx().clone();
                if let Some(status) = self
                    .status
                    .ui_get(ui, None, || AwaitingType(client.sync_status(wake_fn(ctx))))
                {
                    ui_status(ui, status);
                }
            });
            ui_card(ui, "Configuration", |ui| {
                let ctx = ui.ctx().clone();
                if let Some(config) = self
                    .config
                    .ui_get(ui, None, || AwaitingType(client.sync_config(wake_fn(ctx))))
                {
                    ui_config(ui, config);
                }
            });
        });
    }
}

fn ui_status(ui: &mut egui::Ui, status: &SyncStatus) {
    egui::Grid::new("sync status grid")
        .num_columns(2)
        .show(ui, |ui| {
            ui.label("Running");
            if status.running {
                ui_badge(ui, "Running", egui::Color32::from_rgb(180, 140, 0));
            } else {
                ui.label("Idle");
            }
            ui.end_row();

            ui.label("Last sync");
            ui_timestamp_label(ui, status.last_sync);
            ui.end_row();

            ui.label("Last result");
            ui.label(status.last_result.as_deref().unwrap_or("-"));
            ui.end_row();

            ui.label("Events synced");
            match status.events_synced {
                Some(count) => ui.label(count.to_string()),
                None => ui.weak("-"),
            };
            ui.end_row();
        });
}

fn ui_config(ui: &mut egui::Ui, config: &SyncConfig) {
    egui::Grid::new("sync config grid")
        .num_columns(2)
        .show(ui, |ui| {
            ui.label("Enabled");
            crate::ui_helpers::readonly_checkbox_no_text(ui, config.enabled);
            ui.end_row();

            ui.label("Calendar");
            ui.label(config.calendar_id.as_deref().unwrap_or("-"));
            ui.end_row();

            ui.label("Interval");
            match config.interval_minutes {
                Some(minutes) => ui.label(format!("{minutes} minutes")),
                None => ui.weak("-"),
            };
            ui.end_row();
        });
}

fn ui_report(ui: &mut egui::Ui, report: &SyncReport) {
    ui.horizontal(|ui| {
        let (text, fill) = if report.is_clean() {
            ("Sync finished", egui::Color32::DARK_GREEN)
        } else {
            ("Sync finished with errors", egui::Color32::DARK_RED)
        };
        ui_badge(ui, text, fill);
        ui.label(format!(
            "{} changes: {} created, {} updated, {} deleted",
            report.total_changes(),
            report.created,
            report.updated,
            report.deleted
        ));
    });
    for error in report.errors.iter() {
        ui.colored_label(ui.visuals().error_fg_color, error);
    }
}
