use super::{PageAccess, Permission, Permissions, Role, UserIdentity};

/// Body of the auth service's "who am I" endpoint
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<UserIdentity>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub permissions: Permissions,
    #[serde(default)]
    pub is_super_admin: bool,
}

/// The client's in-memory view of who is logged in and what they may do.
///
/// Replaced wholesale by the session store, never edited field by field.
/// When `loading` is false `user` is either fully populated or definitively
/// `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: Option<UserIdentity>,
    pub roles: Vec<Role>,
    pub permissions: Permissions,
    pub is_super_admin: bool,
    pub loading: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::loading()
    }
}

impl Session {
    /// State before the first response from the auth service
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::logged_out()
        }
    }

    pub fn logged_out() -> Self {
        Self {
            user: None,
            roles: Vec::new(),
            permissions: Permissions::default(),
            is_super_admin: false,
            loading: false,
        }
    }

    /// Anything short of an authenticated response with a user degrades to
    /// logged out
    pub fn from_me_response(response: MeResponse) -> Self {
        match response {
            MeResponse {
                authenticated: true,
                user: Some(user),
                roles,
                permissions,
                is_super_admin,
            } => Self {
                user: Some(user),
                roles,
                permissions,
                is_super_admin,
                loading: false,
            },
            _ => Self::logged_out(),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_super_admin(&self) -> bool {
        self.is_super_admin
    }

    pub fn has_permission(&self, name: &str) -> bool {
        self.is_super_admin || self.permissions.contains(name)
    }

    pub fn is_admin(&self) -> bool {
        self.is_super_admin || self.has_permission(Permission::VIEW_ADMIN.as_str())
    }

    /// Evaluates the page level predicate. Does not look at `user` or
    /// `loading`, the route guard does that.
    pub fn satisfies(&self, access: &PageAccess) -> bool {
        match access {
            PageAccess::Public | PageAccess::Authenticated => true,
            PageAccess::Admin => self.is_admin(),
            PageAccess::AdminOr(permission) => {
                self.is_admin() || self.has_permission(permission.as_str())
            }
        }
    }

    /// Roles ordered for display, highest priority first
    pub fn roles_for_display(&self) -> Vec<Role> {
        let mut result = self.roles.clone();
        Role::sort_for_display(&mut result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uac::UserIdentity;
    use rstest::rstest;

    fn user(id: &str) -> UserIdentity {
        UserIdentity {
            id: id.into(),
            username: "tester".try_into().unwrap(),
            display_name: None,
            avatar: None,
        }
    }

    fn session(is_super_admin: bool, permissions: &[&str]) -> Session {
        Session {
            user: Some(user("1")),
            roles: vec![],
            permissions: permissions.iter().copied().collect(),
            is_super_admin,
            loading: false,
        }
    }

    #[rstest]
    #[case("view_admin")]
    #[case("view_cruddy")]
    #[case("")]
    #[case("a permission nobody ever issued")]
    fn super_admin_has_every_permission(#[case] name: &str) {
        assert!(session(true, &[]).has_permission(name));
    }

    #[rstest]
    #[case(&[], "view_cruddy", false)]
    #[case(&["view_cruddy"], "view_cruddy", true)]
    #[case(&["view_cruddy"], "view_devops", false)]
    #[case(&["view_cruddy", "view_devops"], "view_devops", true)]
    #[case(&["view_cruddy"], "view_cruddy ", false)]
    fn non_super_admin_permission_is_set_membership(
        #[case] permissions: &[&str],
        #[case] name: &str,
        #[case] expected: bool,
    ) {
        let session = session(false, permissions);
        assert_eq!(session.has_permission(name), expected);
        assert_eq!(session.has_permission(name), session.permissions.contains(name));
    }

    #[rstest]
    #[case::neither(false, false, false)]
    #[case::view_admin_only(false, true, true)]
    #[case::super_admin_only(true, false, true)]
    #[case::both(true, true, true)]
    fn is_admin_truth_table(
        #[case] is_super_admin: bool,
        #[case] has_view_admin: bool,
        #[case] expected: bool,
    ) {
        let permissions: &[&str] = if has_view_admin { &["view_admin"] } else { &[] };
        assert_eq!(session(is_super_admin, permissions).is_admin(), expected);
    }

    #[rstest]
    #[case::not_authenticated(r#"{"authenticated":false}"#)]
    #[case::authenticated_without_user(r#"{"authenticated":true,"permissions":["view_admin"]}"#)]
    #[case::not_authenticated_with_stale_user(
        r#"{"authenticated":false,"user":{"id":"1","username":"a"},"isSuperAdmin":true}"#
    )]
    fn unauthenticated_responses_give_logged_out_session(#[case] json: &str) {
        // Act
        let response: MeResponse = serde_json::from_str(json).unwrap();
        let actual = Session::from_me_response(response);

        // Assert
        assert_eq!(actual, Session::logged_out());
        assert!(!actual.is_admin());
    }

    #[test]
    fn authenticated_response_populates_session() {
        // Arrange
        let json = r##"{
            "authenticated": true,
            "user": {"id": "42", "username": "emuy", "displayName": "Emuy", "avatar": "abc"},
            "roles": [{"id": "r1", "name": "Officer", "color": "#112233", "priority": 3}],
            "permissions": ["view_cruddy"],
            "isSuperAdmin": false
        }"##;

        // Act
        let actual = Session::from_me_response(serde_json::from_str(json).unwrap());

        // Assert
        assert!(!actual.loading);
        assert_eq!(actual.user.as_ref().unwrap().id.as_ref(), "42");
        assert_eq!(actual.roles.len(), 1);
        assert!(actual.has_permission("view_cruddy"));
        assert!(!actual.is_admin());
    }

    #[test]
    fn default_session_is_loading() {
        let actual = Session::default();
        assert!(actual.loading);
        assert!(actual.user.is_none());
    }
}
