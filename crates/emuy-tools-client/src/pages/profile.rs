use emuy_shared::{routes::Route, uac::Session};

use super::DisplayablePage;
use crate::{
    displayable_page_common,
    ui_helpers::{ui_badge, ui_empty_state, ui_role_name},
};

#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UiProfile {
    is_open: bool,
    page_unique_number: usize,
}

impl DisplayablePage for UiProfile {
    displayable_page_common!("Profile", Route::Profile);

    fn reset_to_default(&mut self, _: super::private::Token) {}

    fn show(&mut self, ui: &mut eframe::egui::Ui, data_shared: &mut crate::DataShared) {
        let session = data_shared.session();
        ui_identity(ui, &session);
        ui.separator();

        ui.strong("Roles");
        let roles = session.roles_for_display();
        if roles.is_empty() {
            ui_empty_state(ui, "No roles");
        }
        for role in roles.iter() {
            ui.horizontal(|ui| {
                ui_role_name(ui, role);
                ui.weak(format!("priority {}", role.priority));
            });
        }
        ui.separator();

        ui.strong("Permissions");
        match permissions_note(&session) {
            Some(note @ PermissionsNote::AllGranted) => {
                ui_badge(ui, note.text(), egui::Color32::DARK_RED);
            }
            Some(note @ PermissionsNote::NoneGranted) => ui_empty_state(ui, note.text()),
            None => {}
        }
        ui.horizontal_wrapped(|ui| {
            for permission in session.permissions.iter() {
                ui.monospace(permission.as_str());
            }
        });
        ui.separator();

        ui.horizontal(|ui| {
            let is_refreshing = data_shared.is_session_refreshing();
            if ui
                .add_enabled(!is_refreshing, egui::Button::new("Refresh Session"))
                .clicked()
            {
                data_shared.refresh_session(ui.ctx());
            }
            if is_refreshing {
                ui.spinner();
            }
            if ui.button("Logout").clicked() {
                data_shared.logout(ui.ctx());
            }
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PermissionsNote {
    AllGranted,
    NoneGranted,
}

impl PermissionsNote {
    fn text(self) -> &'static str {
        match self {
            PermissionsNote::AllGranted => "Super admin: every permission is granted",
            PermissionsNote::NoneGranted => "No permissions",
        }
    }
}

/// Super admins get everything regardless of the listed set
fn permissions_note(session: &Session) -> Option<PermissionsNote> {
    if session.is_super_admin() {
        Some(PermissionsNote::AllGranted)
    } else if session.permissions.is_empty() {
        Some(PermissionsNote::NoneGranted)
    } else {
        None
    }
}

fn ui_identity(ui: &mut egui::Ui, session: &Session) {
    let Some(user) = &session.user else {
        return;
    };
    ui.horizontal(|ui| {
        ui.heading(user.name_to_show());
        if session.is_super_admin() {
            ui_badge(ui, "Super Admin", egui::Color32::DARK_RED);
        } else if session.is_admin() {
            ui_badge(ui, "Admin", egui::Color32::DARK_BLUE);
        }
    });
    egui::Grid::new("profile identity grid")
        .num_columns(2)
        .show(ui, |ui| {
            ui.label("Username");
            ui.label(user.username.to_string());
            ui.end_row();

            ui.label("User id");
            ui.monospace(user.id.to_string());
            ui.end_row();

            if let Some(avatar) = user.avatar.as_deref().filter(|a| a.starts_with("http")) {
                ui.label("Avatar");
                ui.hyperlink_to("Open", avatar);
                ui.end_row();
            }
        });
}

#[cfg(test)]
mod tests {
    use emuy_shared::uac::UserIdentity;
    use rstest::rstest;

    use super::*;

    fn session(is_super_admin: bool, permissions: &[&str]) -> Session {
        Session {
            user: Some(UserIdentity {
                id: "7".into(),
                username: "tester".try_into().unwrap(),
                display_name: None,
                avatar: None,
            }),
            roles: vec![],
            permissions: permissions.iter().copied().collect(),
            is_super_admin,
            loading: false,
        }
    }

    #[rstest]
    #[case::super_admin_without_listed(true, &[], Some(PermissionsNote::AllGranted))]
    #[case::super_admin_with_listed(true, &["view_devops"], Some(PermissionsNote::AllGranted))]
    #[case::regular_without_any(false, &[], Some(PermissionsNote::NoneGranted))]
    #[case::regular_with_some(false, &["view_cruddy"], None)]
    fn permissions_note_reflects_grants(
        #[case] is_super_admin: bool,
        #[case] permissions: &[&str],
        #[case] expected: Option<PermissionsNote>,
    ) {
        // Arrange
        let session = session(is_super_admin, permissions);

        // Act
        let actual = permissions_note(&session);

        // Assert
        assert_eq!(actual, expected);
    }
}
