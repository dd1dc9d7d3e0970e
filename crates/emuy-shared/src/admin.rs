//! Data returned by the auth service's admin endpoints

use chrono::{DateTime, Utc};

use crate::uac::{DisplayName, Permission, Role, UserId, Username};

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: UserId,
    pub username: Username,
    #[serde(default)]
    pub display_name: Option<DisplayName>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub banned: bool,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: i64,
    #[serde(default)]
    pub username: Option<Username>,
    pub action: String,
    #[serde(default)]
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Entry in the catalogue of permissions the auth service knows about
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct PermissionInfo {
    pub name: Permission,
    #[serde(default)]
    pub description: Option<String>,
}

/// Summary card on the dashboard, derived client side from the user list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserStats {
    pub total: usize,
    pub banned: usize,
    pub with_roles: usize,
}

impl AdminUser {
    pub fn name_to_show(&self) -> &str {
        match &self.display_name {
            Some(display_name) if !display_name.as_ref().is_empty() => display_name.as_ref(),
            _ => self.username.as_ref(),
        }
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.iter().any(|r| r.id == role.id)
    }
}

impl UserStats {
    pub fn from_users(users: &[AdminUser]) -> Self {
        Self {
            total: users.len(),
            banned: users.iter().filter(|u| u.banned).count(),
            with_roles: users.iter().filter(|u| !u.roles.is_empty()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, banned: bool, role_count: usize) -> AdminUser {
        AdminUser {
            id: id.into(),
            username: id.try_into().unwrap(),
            display_name: None,
            avatar: None,
            roles: (0..role_count)
                .map(|i| Role {
                    id: format!("r{i}").into(),
                    name: format!("role{i}").try_into().unwrap(),
                    color: None,
                    priority: 0,
                })
                .collect(),
            banned,
            last_login: None,
        }
    }

    #[test]
    fn user_stats() {
        let users = vec![user("a", false, 0), user("b", true, 1), user("c", false, 2)];
        assert_eq!(
            UserStats::from_users(&users),
            UserStats {
                total: 3,
                banned: 1,
                with_roles: 2
            }
        );
    }

    #[test]
    fn activity_entry_from_json() {
        let json = r#"{"id": 9, "username": "emuy", "action": "ban", "createdAt": "2024-05-01T10:00:00Z"}"#;
        let actual: ActivityEntry = serde_json::from_str(json).unwrap();
        assert_eq!(actual.action, "ban");
        assert!(actual.details.is_none());
    }
}
