use egui::Button;
use egui_extras::{Column, TableBuilder};
use emuy_client_core::Client;
use emuy_shared::{
    admin::{ActivityEntry, AdminUser, PermissionInfo},
    routes::Route,
    uac::{Role, RoleId, UserId},
};
use new_role_info::NewRoleInfo;
use strum::IntoEnumIterator as _;

use super::{
    resource::{AwaitingType, Resource},
    DisplayablePage,
};
use crate::{
    app::wake_fn,
    displayable_page_common,
    ui_helpers::{
        get_text_height, readonly_checkbox_no_text, ui_empty_state, ui_escape_button,
        ui_role_name,
    },
};

mod new_role_info;

#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UiAdmin {
    is_open: bool,
    page_unique_number: usize,
    tab: AdminTab,
    #[serde(skip)]
    users: Resource<Vec<AdminUser>>,
    #[serde(skip)]
    roles: Resource<Vec<Role>>,
    #[serde(skip)]
    permissions: Resource<Vec<PermissionInfo>>,
    #[serde(skip)]
    activity: Resource<Vec<ActivityEntry>>,
    #[serde(skip)]
    selected_user: Option<UserId>,
    #[serde(skip)]
    role_to_assign: Option<RoleId>,
    /// Ban, unban and role changes
    #[serde(skip)]
    user_op: Resource<()>,
    #[serde(skip)]
    new_role: Option<NewRoleInfo>,
    #[serde(skip)]
    role_save: Resource<Role>,
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
enum AdminTab {
    #[default]
    Users,
    Roles,
    Permissions,
    #[strum(to_string = "Recent Activity")]
    Activity,
}

impl DisplayablePage for UiAdmin {
    displayable_page_common!("Admin", Route::Admin);

    fn reset_to_default(&mut self, _: super::private::Token) {
        let tab = self.tab;
        *self = Self {
            is_open: self.is_open,
            page_unique_number: self.page_unique_number,
            tab,
            ..Default::default()
        };
    }

    fn show(&mut self, ui: &mut eframe::egui::Ui, data_shared: &mut crate::DataShared) {
        let client = &data_shared.client;
        ui.horizontal(|ui| {
            for tab in AdminTab::iter() {
                ui.selectable_value(&mut self.tab, tab, tab.to_string());
            }
            ui.separator();
            if ui.button("Refresh").clicked() {
                self.reset_tab_data();
            }
        });
        ui.separator();

        match self.tab {
            AdminTab::Users => self.ui_users_tab(ui, client),
            AdminTab::Roles => self.ui_roles_tab(ui, client),
            AdminTab::Permissions => self.ui_permissions_tab(ui, client),
            AdminTab::Activity => self.ui_activity_tab(ui, client),
        }
    }
}

impl UiAdmin {
    fn reset_tab_data(&mut self) {
        match self.tab {
            AdminTab::Users => {
                self.users.reset();
                self.roles.reset();
            }
            AdminTab::Roles => {
                self.roles.reset();
                self.permissions.reset();
            }
            AdminTab::Permissions => self.permissions.reset(),
            AdminTab::Activity => self.activity.reset(),
        }
    }

    fn ui_users_tab(&mut self, ui: &mut egui::Ui, client: &Client) {
        if self.user_op.ui_operation(ui, "Saving...").is_some() {
            // Reload to show what the auth service now has
            self.users.reset();
        }
        let ctx = ui.ctx().clone();
        let Some(users) = self
            .users
            .ui_get(ui, None, || AwaitingType(client.list_users(wake_fn(ctx))))
        else {
            return;
        };
        if users.is_empty() {
            ui_empty_state(ui, "No users found");
            return;
        }
        let is_busy = self.user_op.is_loading();
        let selected = self
            .selected_user
            .as_ref()
            .and_then(|id| users.iter().find(|u| &u.id == id))
            .cloned();

        egui::ScrollArea::horizontal()
            .id_salt("users table")
            .show(ui, |ui| {
                if let Some(op) = ui_user_table(ui, users, self.selected_user.as_ref(), is_busy) {
                    match op {
                        UserRowAction::Select(id) => {
                            self.role_to_assign = None;
                            self.selected_user = Some(id);
                        }
                        UserRowAction::Ban(id) => {
                            let ctx = ui.ctx().clone();
                            self.user_op.start(client.ban_user(&id, wake_fn(ctx)));
                        }
                        UserRowAction::Unban(id) => {
                            let ctx = ui.ctx().clone();
                            self.user_op.start(client.unban_user(&id, wake_fn(ctx)));
                        }
                    }
                }
            });

        if let Some(user) = selected {
            ui.separator();
            self.ui_user_roles(ui, client, &user, is_busy);
        }
    }

    fn ui_user_roles(
        &mut self,
        ui: &mut egui::Ui,
        client: &Client,
        user: &AdminUser,
        is_busy: bool,
    ) {
        ui.strong(format!("Roles of {}", user.name_to_show()));
        if user.roles.is_empty() {
            ui_empty_state(ui, "No roles assigned");
        }
        for role in user.roles.iter() {
            ui.horizontal(|ui| {
                ui_role_name(ui, role);
                if ui
                    .add_enabled(!is_busy, Button::new("Remove"))
                    .clicked()
                {
                    let ctx = ui.ctx().clone();
                    self.user_op
                        .start(client.remove_role(&user.id, &role.id, wake_fn(ctx)));
                }
            });
        }

        let ctx = ui.ctx().clone();
        let Some(roles) = self.roles.ui_get(ui, Some("Retry loading roles"), || {
            AwaitingType(client.list_roles(wake_fn(ctx)))
        }) else {
            return;
        };
        let assignable: Vec<&Role> = roles.iter().filter(|r| !user.has_role(r)).collect();
        if assignable.is_empty() {
            return;
        }
        ui.horizontal(|ui| {
            let selected_text = self
                .role_to_assign
                .as_ref()
                .and_then(|id| assignable.iter().find(|r| &r.id == id))
                .map(|r| r.name.to_string())
                .unwrap_or_else(|| "Select a role".to_string());
            egui::ComboBox::from_id_salt("role to assign")
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    for role in assignable.iter() {
                        ui.selectable_value(
                            &mut self.role_to_assign,
                            Some(role.id.clone()),
                            &role.name,
                        );
                    }
                });
            let can_assign = !is_busy && self.role_to_assign.is_some();
            if ui.add_enabled(can_assign, Button::new("Assign")).clicked() {
                if let Some(role_id) = self.role_to_assign.take() {
                    let ctx = ui.ctx().clone();
                    self.user_op
                        .start(client.assign_role(&user.id, &role_id, wake_fn(ctx)));
                }
            }
            if ui_escape_button(ui, "Done") {
                self.selected_user = None;
                self.role_to_assign = None;
            }
        });
    }

    fn ui_roles_tab(&mut self, ui: &mut egui::Ui, client: &Client) {
        if let Some(role) = self.role_save.ui_operation(ui, "Creating role...") {
            tracing::info!(name = %&*role.name, "role created");
            self.new_role = None;
            self.roles.reset();
        }

        match self.new_role.as_mut() {
            Some(form) => {
                let ctx = ui.ctx().clone();
                let catalogue =
                    self.permissions
                        .ui_get(ui, Some("Retry loading permissions"), || {
                            AwaitingType(client.list_permissions(wake_fn(ctx)))
                        });
                match ui_new_role_form(ui, form, catalogue.map(|c| &c[..])) {
                    FormAction::None => {}
                    FormAction::Save(draft) => {
                        let ctx = ui.ctx().clone();
                        self.role_save.start(client.create_role(&draft, wake_fn(ctx)));
                    }
                    FormAction::Cancel => self.new_role = None,
                }
                ui.separator();
            }
            None => {
                if ui.button("New Role").clicked() {
                    self.new_role = Some(NewRoleInfo::default());
                }
            }
        }

        let ctx = ui.ctx().clone();
        let Some(roles) = self
            .roles
            .ui_get(ui, None, || AwaitingType(client.list_roles(wake_fn(ctx))))
        else {
            return;
        };
        if roles.is_empty() {
            ui_empty_state(ui, "No roles defined");
            return;
        }
        let mut sorted = roles.clone();
        Role::sort_for_display(&mut sorted);
        egui::Grid::new("roles grid")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                ui.strong("Role");
                ui.strong("Priority");
                ui.end_row();
                for role in sorted.iter() {
                    ui_role_name(ui, role);
                    ui.label(role.priority.to_string());
                    ui.end_row();
                }
            });
    }

    fn ui_permissions_tab(&mut self, ui: &mut egui::Ui, client: &Client) {
        let ctx = ui.ctx().clone();
        let Some(permissions) = self.permissions.ui_get(ui, None, || {
            AwaitingType(client.list_permissions(wake_fn(ctx)))
        }) else {
            return;
        };
        if permissions.is_empty() {
            ui_empty_state(ui, "No permissions defined");
            return;
        }
        egui::Grid::new("permissions grid")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                for permission in permissions.iter() {
                    ui.monospace(permission.name.as_str());
                    ui.label(permission.description.as_deref().unwrap_or_default());
                    ui.end_row();
                }
            });
    }

    fn ui_activity_tab(&mut self, ui: &mut egui::Ui, client: &Client) {
        let ctx = ui.ctx().clone();
        let Some(activity) = self.activity.ui_get(ui, None, || {
            AwaitingType(client.recent_activity(wake_fn(ctx)))
        }) else {
            return;
        };
        if activity.is_empty() {
            ui_empty_state(ui, "No recent activity");
            return;
        }
        egui::Grid::new("activity grid")
            .num_columns(4)
            .striped(true)
            .show(ui, |ui| {
                for entry in activity.iter() {
                    ui.label(entry.created_at.format("%Y-%m-%d %H:%M").to_string());
                    match &entry.username {
                        Some(username) => ui.label(username),
                        None => ui.weak("system"),
                    };
                    ui.strong(&entry.action);
                    ui.label(entry.details.as_deref().unwrap_or_default());
                    ui.end_row();
                }
            });
    }
}

enum UserRowAction {
    Select(UserId),
    Ban(UserId),
    Unban(UserId),
}

#[must_use]
enum FormAction<T> {
    None,
    Save(T),
    Cancel,
}

fn ui_user_table(
    ui: &mut egui::Ui,
    users: &[AdminUser],
    selected: Option<&UserId>,
    is_busy: bool,
) -> Option<UserRowAction> {
    let mut result = None;
    let text_height = get_text_height(ui);
    let table = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .min_scrolled_height(0.0)
        .header(text_height, |mut header| {
            header.col(|ui| {
                ui.strong("Name");
            });
            header.col(|ui| {
                ui.strong("Username");
            });
            header.col(|ui| {
                ui.strong("Roles");
            });
            header.col(|ui| {
                ui.strong("Banned");
            });
            header.col(|ui| {
                ui.strong("Last Login");
            });
            header.col(|ui| {
                ui.strong("Actions");
            });
        });

    table.body(|body| {
        body.rows(text_height, users.len(), |mut row| {
            let user = &users[row.index()];
            row.set_selected(selected == Some(&user.id));
            row.col(|ui| {
                ui.label(user.name_to_show());
            });
            row.col(|ui| {
                ui.label(&user.username);
            });
            row.col(|ui| {
                ui.label(user.roles.len().to_string());
            });
            row.col(|ui| {
                readonly_checkbox_no_text(ui, user.banned);
            });
            row.col(|ui| {
                match user.last_login {
                    Some(at) => ui.label(at.format("%Y-%m-%d %H:%M").to_string()),
                    None => ui.weak("never"),
                };
            });
            row.col(|ui| {
                if ui.button("Roles").clicked() {
                    result = Some(UserRowAction::Select(user.id.clone()));
                }
                let (caption, action) = if user.banned {
                    ("Unban", UserRowAction::Unban(user.id.clone()))
                } else {
                    ("Ban", UserRowAction::Ban(user.id.clone()))
                };
                if ui.add_enabled(!is_busy, Button::new(caption)).clicked() {
                    result = Some(action);
                }
            });
        });
    });
    result
}

fn ui_new_role_form(
    ui: &mut egui::Ui,
    form: &mut NewRoleInfo,
    catalogue: Option<&[PermissionInfo]>,
) -> FormAction<emuy_shared::uac::RoleDraft> {
    let draft = form.to_draft();
    egui::Grid::new("new role grid")
        .num_columns(2)
        .show(ui, |ui| {
            ui.label("Name");
            ui.text_edit_singleline(&mut form.name);
            ui.end_row();

            ui.label("Colour");
            ui.add(egui::TextEdit::singleline(&mut form.color).hint_text("#rrggbb"));
            ui.end_row();

            ui.label("Priority");
            ui.add(egui::DragValue::new(&mut form.priority));
            ui.end_row();

            ui.label("Permissions");
            ui.vertical(|ui| {
                for info in catalogue.unwrap_or_default() {
                    let mut is_granted = form.permissions.contains(&info.name);
                    let response = ui.checkbox(&mut is_granted, info.name.as_str());
                    let response = match &info.description {
                        Some(description) => response.on_hover_text(description),
                        None => response,
                    };
                    if response.changed() {
                        form.toggle_permission(&info.name, is_granted);
                    }
                }
            });
            ui.end_row();
        });

    if let Err(e) = &draft {
        ui.colored_label(ui.visuals().error_fg_color, e);
    }
    let mut result = FormAction::None;
    ui.horizontal(|ui| {
        if ui
            .add_enabled(draft.is_ok(), Button::new("Create Role"))
            .clicked()
        {
            if let Ok(draft) = form.to_draft() {
                result = FormAction::Save(draft);
            }
        }
        if ui_escape_button(ui, "Cancel") {
            result = FormAction::Cancel;
        }
    });
    result
}
