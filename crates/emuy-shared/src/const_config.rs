//! Stores settings that are not expected to need to change but grouped together
//! for discoverability and reuse. Each constant should be prefixed by the module
//! name to allow importing the constant only and still be readable

use emuy_time::Seconds;

pub mod health {
    use super::*;

    /// Health probes are abandoned after this long and reported as timed out
    pub const HEALTH_CHECK_TIMEOUT: Seconds = Seconds::new(5);

    /// How often the health monitor re-issues its probes while it is alive
    pub const HEALTH_POLL_INTERVAL: Seconds = Seconds::new(60);

    /// Appended to a service's base url to probe it
    pub const HEALTH_PATH: &str = "/health";
}

pub mod client {
    use super::*;

    /// Upper bound between repaints so clocks and pollers stay current while
    /// the user is idle
    pub const CLIENT_IDLE_REPAINT: Seconds = Seconds::new(1);

    /// Key used in the persistent key-value storage for the GitHub personal
    /// access token. Nothing else from the session is persisted.
    pub const GITHUB_TOKEN_STORAGE_KEY: &str = "emuy_github_token";
}

pub mod path {
    mod path_spec;
    pub use path_spec::{PathSpec, Service};

    use reqwest::Method;

    // Auth collaborator
    pub const PATH_AUTH_ME: PathSpec = PathSpec::get(Service::Auth, "/auth/me");
    pub const PATH_AUTH_LOGIN: PathSpec = PathSpec::get(Service::Auth, "/auth/login");
    pub const PATH_AUTH_LOGOUT: PathSpec = PathSpec::get(Service::Auth, "/auth/logout");
    pub const PATH_AUTH_ADMIN_USERS: PathSpec = PathSpec::get(Service::Auth, "/auth/admin/users");
    pub const PATH_AUTH_ADMIN_ROLES: PathSpec = PathSpec::get(Service::Auth, "/auth/admin/roles");
    pub const PATH_AUTH_ADMIN_ROLE_CREATE: PathSpec =
        PathSpec::post(Service::Auth, "/auth/admin/roles");
    pub const PATH_AUTH_ADMIN_PERMISSIONS: PathSpec =
        PathSpec::get(Service::Auth, "/auth/admin/permissions");
    pub const PATH_AUTH_ADMIN_ACTIVITY: PathSpec =
        PathSpec::get(Service::Auth, "/auth/admin/activity");

    pub fn path_auth_admin_user_ban(user_id: &str) -> PathSpec {
        PathSpec::dynamic(
            Service::Auth,
            Method::POST,
            format!("/auth/admin/users/{user_id}/ban"),
        )
    }

    pub fn path_auth_admin_user_unban(user_id: &str) -> PathSpec {
        PathSpec::dynamic(
            Service::Auth,
            Method::POST,
            format!("/auth/admin/users/{user_id}/unban"),
        )
    }

    pub fn path_auth_admin_user_role_assign(user_id: &str) -> PathSpec {
        PathSpec::dynamic(
            Service::Auth,
            Method::POST,
            format!("/auth/admin/users/{user_id}/roles"),
        )
    }

    pub fn path_auth_admin_user_role_remove(user_id: &str, role_id: &str) -> PathSpec {
        PathSpec::dynamic(
            Service::Auth,
            Method::DELETE,
            format!("/auth/admin/users/{user_id}/roles/{role_id}"),
        )
    }

    // Attendance collaborator
    pub const PATH_ATTENDANCE_RECORDS: PathSpec =
        PathSpec::get(Service::Attendance, "/attendance/records");
    pub const PATH_ATTENDANCE_RECORD_CREATE: PathSpec =
        PathSpec::post(Service::Attendance, "/attendance/records");
    pub const PATH_ATTENDANCE_LEADERBOARD: PathSpec =
        PathSpec::get(Service::Attendance, "/attendance/leaderboard");
    pub const PATH_ATTENDANCE_STATS: PathSpec =
        PathSpec::get(Service::Attendance, "/attendance/stats");

    pub fn path_attendance_record_update(record_id: i64) -> PathSpec {
        PathSpec::dynamic(
            Service::Attendance,
            Method::PUT,
            format!("/attendance/records/{record_id}"),
        )
    }

    pub fn path_attendance_record_delete(record_id: i64) -> PathSpec {
        PathSpec::dynamic(
            Service::Attendance,
            Method::DELETE,
            format!("/attendance/records/{record_id}"),
        )
    }

    // Calendar sync worker
    pub const PATH_SYNC_STATUS: PathSpec = PathSpec::get(Service::CalendarSync, "/status");
    pub const PATH_SYNC_CONFIG: PathSpec = PathSpec::get(Service::CalendarSync, "/config");
    pub const PATH_SYNC_TRIGGER: PathSpec = PathSpec::post(Service::CalendarSync, "/sync");

    // GitHub REST
    pub fn path_github_branch_commits(repo: &str, branch: &str) -> PathSpec {
        PathSpec::dynamic(
            Service::GitHub,
            Method::GET,
            format!("/repos/{repo}/commits/{branch}"),
        )
    }

    pub fn path_github_workflow_runs(repo: &str) -> PathSpec {
        PathSpec::dynamic(
            Service::GitHub,
            Method::GET,
            format!("/repos/{repo}/actions/runs"),
        )
    }

    pub fn path_github_workflows(repo: &str) -> PathSpec {
        PathSpec::dynamic(
            Service::GitHub,
            Method::GET,
            format!("/repos/{repo}/actions/workflows"),
        )
    }

    pub fn path_github_workflow_dispatch(repo: &str, workflow_id: u64) -> PathSpec {
        PathSpec::dynamic(
            Service::GitHub,
            Method::POST,
            format!("/repos/{repo}/actions/workflows/{workflow_id}/dispatches"),
        )
    }

    pub fn path_github_compare(repo: &str, base: &str, head: &str) -> PathSpec {
        PathSpec::dynamic(
            Service::GitHub,
            Method::GET,
            format!("/repos/{repo}/compare/{base}...{head}"),
        )
    }

    pub fn path_github_merge(repo: &str) -> PathSpec {
        PathSpec::dynamic(Service::GitHub, Method::POST, format!("/repos/{repo}/merges"))
    }

    // The configured board url is already the full GraphQL endpoint
    pub const PATH_PROJECT_BOARD_QUERY: PathSpec = PathSpec::post(Service::ProjectBoard, "");
}

#[cfg(test)]
mod tests {
    use super::health::{HEALTH_CHECK_TIMEOUT, HEALTH_POLL_INTERVAL};
    use static_assertions::const_assert;

    // A probe must finish (or time out) before the next round is due
    const_assert!(HEALTH_CHECK_TIMEOUT.as_u64() < HEALTH_POLL_INTERVAL.as_u64());

    #[test]
    fn github_compare_path_uses_triple_dot() {
        let compare = super::path::path_github_compare("emuy/tools", "main", "dev");
        assert_eq!(compare.path(), "/repos/emuy/tools/compare/main...dev");
    }
}
