use emuy_client_core::{Client, HealthMonitor};
use emuy_shared::health::{HealthStatus, ServiceHealth};
use tracing::info;

use crate::{app::wake_fn, ui_helpers::ui_badge};

/// Owns the monitor so closing the page stops the polling
#[derive(Debug, Default)]
pub struct HealthPanel {
    monitor: Option<HealthMonitor>,
}

impl HealthPanel {
    /// Called every frame the page is shown
    pub fn tick(&mut self, ctx: &egui::Context, client: &Client) {
        let monitor = self.monitor.get_or_insert_with(|| {
            info!("starting health monitor");
            HealthMonitor::from_config(&client.config())
        });
        let remaining = monitor.tick(client, || wake_fn(ctx.clone()));
        // Wake up for the next round even if nothing else happens
        ctx.request_repaint_after(remaining.into());
    }

    pub fn ui_summary(&self, ui: &mut egui::Ui) {
        let Some(monitor) = &self.monitor else {
            return;
        };
        let summary = monitor.summary();
        if summary.total == 0 {
            if monitor.is_checking() {
                ui.spinner();
            }
            return;
        }
        let fill = if summary.all_healthy() {
            egui::Color32::DARK_GREEN
        } else {
            egui::Color32::DARK_RED
        };
        ui_badge(
            ui,
            format!("{}/{} services healthy", summary.healthy, summary.total),
            fill,
        );
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) {
        let Some(monitor) = self.monitor.as_mut() else {
            return;
        };
        ui.horizontal(|ui| {
            if monitor.is_checking() {
                ui.spinner();
                ui.label("Checking...");
            } else if ui.button("Check Now").clicked() {
                monitor.check_now();
            }
            match monitor.last_round() {
                Some(at) => ui.weak(format!(
                    "Last checked {} (every {})",
                    at.display_as_local_time(),
                    monitor.interval()
                )),
                None => ui.weak("Not checked yet"),
            };
        });
        ui.separator();

        egui::Grid::new("health grid")
            .num_columns(4)
            .striped(true)
            .show(ui, |ui| {
                ui.strong("Service");
                ui.strong("Status");
                ui.strong("Latency");
                ui.strong("Checked");
                ui.end_row();
                for (target, result) in monitor.results() {
                    ui.label(&target.name).on_hover_text(&target.url);
                    match result {
                        Some(health) => ui_health_result(ui, health),
                        None => {
                            ui.spinner();
                            ui.label("-");
                            ui.label("-");
                        }
                    }
                    ui.end_row();
                }
            });
    }
}

fn ui_health_result(ui: &mut egui::Ui, health: &ServiceHealth) {
    ui_badge(ui, health.status.to_string(), status_color(&health.status));
    ui.label(health.latency.to_string());
    ui.label(health.checked_at.display_as_local_time());
}

fn status_color(status: &HealthStatus) -> egui::Color32 {
    match status {
        HealthStatus::Healthy => egui::Color32::DARK_GREEN,
        HealthStatus::Unhealthy { .. } => egui::Color32::from_rgb(200, 120, 0),
        HealthStatus::TimedOut | HealthStatus::Unreachable(_) => egui::Color32::DARK_RED,
    }
}
