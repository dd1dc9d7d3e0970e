use emuy_shared::{
    admin::{AdminUser, UserStats},
    attendance::AttendanceStats,
    routes::Route,
};

use super::{
    resource::{AwaitingType, Resource},
    DisplayablePage,
};
use crate::{app::wake_fn, displayable_page_common, ui_helpers::ui_card};

#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UiDashboard {
    is_open: bool,
    page_unique_number: usize,
    #[serde(skip)]
    attendance_stats: Resource<AttendanceStats>,
    /// Only requested for admins, the auth service refuses everyone else
    #[serde(skip)]
    users: Resource<Vec<AdminUser>>,
}

impl DisplayablePage for UiDashboard {
    displayable_page_common!("Dashboard", Route::Dashboard);

    fn reset_to_default(&mut self, _: super::private::Token) {
        self.attendance_stats = Default::default();
        self.users = Default::default();
    }

    fn show(&mut self, ui: &mut eframe::egui::Ui, data_shared: &mut crate::DataShared) {
        let session = data_shared.session();
        let client = &data_shared.client;

        ui.horizontal(|ui| {
            if ui.button("Refresh").clicked() {
                self.attendance_stats.reset();
                self.users.reset();
            }
        });
        ui.separator();

        // Both cards start their request on the same frame so they load in
        // parallel
        ui.horizontal_wrapped(|ui| {
            ui_card(ui, "Attendance", |ui| {
                let ctx = ui.ctx().clone();
                if let Some(stats) = self.attendance_stats.ui_get(ui, None, || {
                    AwaitingType(client.attendance_stats(wake_fn(ctx)))
                }) {
                    ui_attendance_stats(ui, stats);
                }
            });

            if session.is_admin() {
                ui_card(ui, "Users", |ui| {
                    let ctx = ui.ctx().clone();
                    if let Some(users) = self
                        .users
                        .ui_get(ui, None, || AwaitingType(client.list_users(wake_fn(ctx))))
                    {
                        ui_user_stats(ui, &UserStats::from_users(users));
                    }
                });
            }
        });
    }
}

fn ui_attendance_stats(ui: &mut egui::Ui, stats: &AttendanceStats) {
    egui::Grid::new("attendance stats grid")
        .num_columns(2)
        .show(ui, |ui| {
            ui.label("Total records");
            ui.strong(stats.total.to_string());
            ui.end_row();

            ui.label("Unique names");
            ui.strong(stats.unique_names.to_string());
            ui.end_row();

            ui.label("Unique events");
            ui.strong(stats.unique_events.to_string());
            ui.end_row();
        });
}

fn ui_user_stats(ui: &mut egui::Ui, stats: &UserStats) {
    egui::Grid::new("user stats grid")
        .num_columns(2)
        .show(ui, |ui| {
            ui.label("Total users");
            ui.strong(stats.total.to_string());
            ui.end_row();

            ui.label("Banned");
            ui.strong(stats.banned.to_string());
            ui.end_row();

            ui.label("With roles");
            ui.strong(stats.with_roles.to_string());
            ui.end_row();
        });
}
