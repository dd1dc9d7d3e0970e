//! Decides whether a page may render for the current session.
//!
//! The guard is a tiny state machine: `Loading` until the session store has
//! resolved its first fetch, then one of the terminal states `Denied` (with
//! the route to fall back to) or `Allowed`. It never polls; changes in
//! permissions only show up after the session is refreshed.

use crate::routes::Route;

use super::{Permission, Session};

/// What a page requires of the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAccess {
    /// Rendered for everyone once the session has resolved
    Public,
    /// Any logged in user
    Authenticated,
    Admin,
    /// Admins or anyone holding the permission
    AdminOr(Permission),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Loading,
    Denied { redirect: Route },
    Allowed,
}

impl GuardOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

#[tracing::instrument(level = "trace", ret, skip(session), fields(loading = session.loading, logged_in = session.is_logged_in()))]
pub fn evaluate_guard(session: &Session, access: &PageAccess) -> GuardOutcome {
    if session.loading {
        return GuardOutcome::Loading;
    }
    if *access == PageAccess::Public {
        return GuardOutcome::Allowed;
    }
    if session.user.is_none() || !session.satisfies(access) {
        return GuardOutcome::Denied {
            redirect: Route::FALLBACK,
        };
    }
    GuardOutcome::Allowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uac::UserIdentity;
    use rstest::rstest;

    fn session(has_user: bool, is_super_admin: bool, permissions: &[&str], loading: bool) -> Session {
        Session {
            user: has_user.then(|| UserIdentity {
                id: "1".into(),
                username: "tester".try_into().unwrap(),
                display_name: None,
                avatar: None,
            }),
            roles: vec![],
            permissions: permissions.iter().copied().collect(),
            is_super_admin,
            loading,
        }
    }

    fn all_access() -> Vec<PageAccess> {
        vec![
            PageAccess::Public,
            PageAccess::Authenticated,
            PageAccess::Admin,
            PageAccess::AdminOr(Permission::VIEW_CRUDDY),
            PageAccess::AdminOr(Permission::VIEW_DEVOPS),
        ]
    }

    #[rstest]
    #[case::no_user(false, false, &[])]
    #[case::user(true, false, &[])]
    #[case::super_admin(true, true, &[])]
    #[case::stale_permissions_without_user(false, true, &["view_admin"])]
    fn loading_never_redirects(
        #[case] has_user: bool,
        #[case] is_super_admin: bool,
        #[case] permissions: &[&str],
    ) {
        let session = session(has_user, is_super_admin, permissions, true);
        for access in all_access() {
            assert_eq!(evaluate_guard(&session, &access), GuardOutcome::Loading);
        }
    }

    #[rstest]
    #[case::nothing(false, &[])]
    #[case::super_admin_flag(true, &[])]
    #[case::every_permission(false, &["view_admin", "view_cruddy", "view_devops"])]
    fn no_user_always_redirects_to_landing(
        #[case] is_super_admin: bool,
        #[case] permissions: &[&str],
    ) {
        let session = session(false, is_super_admin, permissions, false);
        for access in all_access()
            .into_iter()
            .filter(|a| *a != PageAccess::Public)
        {
            assert_eq!(
                evaluate_guard(&session, &access),
                GuardOutcome::Denied {
                    redirect: Route::Landing
                }
            );
        }
    }

    #[rstest]
    #[case::authenticated(PageAccess::Authenticated, &[], true)]
    #[case::admin_denied(PageAccess::Admin, &["view_cruddy"], false)]
    #[case::admin_allowed(PageAccess::Admin, &["view_admin"], true)]
    #[case::cruddy_allowed(PageAccess::AdminOr(Permission::VIEW_CRUDDY), &["view_cruddy"], true)]
    #[case::cruddy_via_admin(PageAccess::AdminOr(Permission::VIEW_CRUDDY), &["view_admin"], true)]
    #[case::cruddy_denied(PageAccess::AdminOr(Permission::VIEW_CRUDDY), &["view_devops"], false)]
    fn logged_in_user_follows_predicate(
        #[case] access: PageAccess,
        #[case] permissions: &[&str],
        #[case] is_allowed: bool,
    ) {
        // Arrange
        let session = session(true, false, permissions, false);
        let expected = if is_allowed {
            GuardOutcome::Allowed
        } else {
            GuardOutcome::Denied {
                redirect: Route::Landing,
            }
        };

        // Act
        let actual = evaluate_guard(&session, &access);

        // Assert
        assert_eq!(actual, expected);
    }

    #[test]
    fn logged_out_session_on_admin_page_goes_home() {
        let session = Session::logged_out();
        let outcome = evaluate_guard(&session, &Route::Admin.access());
        assert_eq!(
            outcome,
            GuardOutcome::Denied {
                redirect: Route::Landing
            }
        );
        assert_eq!(Route::Landing.path(), "/");
    }

    #[test]
    fn cruddy_user_gets_cruddy_panel_but_not_admin() {
        let session = session(true, false, &["view_cruddy"], false);
        assert_eq!(
            evaluate_guard(&session, &Route::CruddyPanel.access()),
            GuardOutcome::Allowed
        );
        assert_eq!(
            evaluate_guard(&session, &Route::Admin.access()),
            GuardOutcome::Denied {
                redirect: Route::Landing
            }
        );
    }

    #[test]
    fn landing_is_allowed_when_logged_out() {
        assert!(evaluate_guard(&Session::logged_out(), &Route::Landing.access()).is_allowed());
    }
}
