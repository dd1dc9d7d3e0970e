use emuy_shared::{
    admin::{ActivityEntry, AdminUser, PermissionInfo},
    const_config::path::{
        path_auth_admin_user_ban, path_auth_admin_user_role_assign,
        path_auth_admin_user_role_remove, path_auth_admin_user_unban, PATH_AUTH_ADMIN_ACTIVITY,
        PATH_AUTH_ADMIN_PERMISSIONS, PATH_AUTH_ADMIN_ROLES, PATH_AUTH_ADMIN_ROLE_CREATE,
        PATH_AUTH_ADMIN_USERS,
    },
    req_args::{ActivityReqArgs, AssignRoleReqArgs, NoArgs},
    uac::{Role, RoleDraft, RoleId, UserId},
};

use crate::{
    client::{ResponseReceiver, UiCallBack},
    Client,
};

impl Client {
    #[tracing::instrument(skip(ui_notify))]
    pub fn list_users<F: UiCallBack>(&self, ui_notify: F) -> ResponseReceiver<Vec<AdminUser>> {
        self.send_request_expect_json(PATH_AUTH_ADMIN_USERS, &NoArgs {}, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn ban_user<F: UiCallBack>(&self, user_id: &UserId, ui_notify: F) -> ResponseReceiver<()> {
        self.send_request_expect_empty(
            path_auth_admin_user_ban(user_id.as_ref()),
            &NoArgs {},
            ui_notify,
        )
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn unban_user<F: UiCallBack>(
        &self,
        user_id: &UserId,
        ui_notify: F,
    ) -> ResponseReceiver<()> {
        self.send_request_expect_empty(
            path_auth_admin_user_unban(user_id.as_ref()),
            &NoArgs {},
            ui_notify,
        )
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn assign_role<F: UiCallBack>(
        &self,
        user_id: &UserId,
        role_id: &RoleId,
        ui_notify: F,
    ) -> ResponseReceiver<()> {
        let args = AssignRoleReqArgs {
            role_id: role_id.clone(),
        };
        self.send_request_expect_empty(
            path_auth_admin_user_role_assign(user_id.as_ref()),
            &args,
            ui_notify,
        )
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn remove_role<F: UiCallBack>(
        &self,
        user_id: &UserId,
        role_id: &RoleId,
        ui_notify: F,
    ) -> ResponseReceiver<()> {
        self.send_request_expect_empty(
            path_auth_admin_user_role_remove(user_id.as_ref(), role_id.as_ref()),
            &NoArgs {},
            ui_notify,
        )
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn list_roles<F: UiCallBack>(&self, ui_notify: F) -> ResponseReceiver<Vec<Role>> {
        self.send_request_expect_json(PATH_AUTH_ADMIN_ROLES, &NoArgs {}, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn create_role<F: UiCallBack>(
        &self,
        draft: &RoleDraft,
        ui_notify: F,
    ) -> ResponseReceiver<Role> {
        self.send_request_expect_json(PATH_AUTH_ADMIN_ROLE_CREATE, draft, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn list_permissions<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> ResponseReceiver<Vec<PermissionInfo>> {
        self.send_request_expect_json(PATH_AUTH_ADMIN_PERMISSIONS, &NoArgs {}, ui_notify)
    }

    /// Most recent first, as many as the configured activity limit
    #[tracing::instrument(skip(ui_notify))]
    pub fn recent_activity<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> ResponseReceiver<Vec<ActivityEntry>> {
        let args = ActivityReqArgs {
            limit: self.config().admin.activity_limit,
        };
        self.send_request_expect_json(PATH_AUTH_ADMIN_ACTIVITY, &args, ui_notify)
    }
}
