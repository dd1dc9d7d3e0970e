use emuy_shared::routes::Route;
use strum::IntoEnumIterator as _;

use super::{is_route_accessible, route_title, DisplayablePage};
use crate::displayable_page_common;

/// Where everyone starts and where denied pages send the user
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UiLanding {
    is_open: bool,
    page_unique_number: usize,
}

impl DisplayablePage for UiLanding {
    displayable_page_common!("Home", Route::Landing);

    fn reset_to_default(&mut self, _: super::private::Token) {}

    fn show(&mut self, ui: &mut eframe::egui::Ui, data_shared: &mut crate::DataShared) {
        let session = data_shared.session();
        ui.vertical_centered(|ui| {
            ui.heading("Emuy Tools");
            ui.label("Administration for the Emuy community");
        });
        ui.separator();

        let Some(user) = &session.user else {
            ui.label("You are not logged in. Log in with Discord to see the tools you have access to.");
            if ui.button("Login").clicked() {
                data_shared.login(ui.ctx());
            }
            return;
        };

        ui.horizontal(|ui| {
            ui.label(format!("Welcome back, {}", user.name_to_show()));
            if session.is_super_admin() {
                crate::ui_helpers::ui_badge(ui, "Super Admin", egui::Color32::DARK_RED);
            }
        });
        ui.add_space(8.0);
        ui.strong("Available pages");
        let routes: Vec<Route> = Route::iter()
            .filter(|r| *r != Route::Landing && is_route_accessible(*r, &session))
            .collect();
        for route in routes {
            ui.horizontal(|ui| {
                if ui.link(route_title(route)).clicked() {
                    data_shared.navigate_to(route);
                }
                ui.weak(route.path());
            });
        }
        ui.add_space(8.0);
        if ui.button("Logout").clicked() {
            data_shared.logout(ui.ctx());
        }
    }
}
