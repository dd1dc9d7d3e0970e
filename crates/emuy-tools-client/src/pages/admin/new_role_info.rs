use std::collections::BTreeSet;

use emuy_shared::uac::{Permission, Permissions, RoleDraft, RoleName};

#[derive(Debug, Default)]
pub struct NewRoleInfo {
    pub name: String,
    /// `#rrggbb` or empty for no colour
    pub color: String,
    pub priority: i32,
    pub permissions: BTreeSet<Permission>,
}

impl NewRoleInfo {
    pub fn toggle_permission(&mut self, permission: &Permission, is_granted: bool) {
        if is_granted {
            self.permissions.insert(permission.clone());
        } else {
            self.permissions.remove(permission);
        }
    }

    /// Fails with a message suitable for showing next to the form
    pub fn to_draft(&self) -> Result<RoleDraft, String> {
        let name = RoleName::try_from(self.name.trim().to_string())
            .map_err(|e| format!("Name: {e}"))?;
        let color = self.color.trim();
        let color = if color.is_empty() {
            None
        } else if is_hex_color(color) {
            Some(color.to_string())
        } else {
            return Err("Colour must look like #rrggbb".to_string());
        };
        Ok(RoleDraft {
            name,
            color,
            priority: self.priority,
            permissions: Permissions(self.permissions.clone()),
        })
    }
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn info(name: &str, color: &str) -> NewRoleInfo {
        NewRoleInfo {
            name: name.to_string(),
            color: color.to_string(),
            priority: 3,
            permissions: BTreeSet::new(),
        }
    }

    #[test]
    fn valid_form_becomes_draft() {
        // Arrange
        let mut form = info("  Officer ", "#A0b1C2");
        form.toggle_permission(&Permission::VIEW_CRUDDY, true);
        form.toggle_permission(&Permission::VIEW_DEVOPS, true);
        form.toggle_permission(&Permission::VIEW_DEVOPS, false);

        // Act
        let actual = form.to_draft().unwrap();

        // Assert
        assert_eq!(&*actual.name, "Officer");
        assert_eq!(actual.color.as_deref(), Some("#A0b1C2"));
        assert_eq!(actual.priority, 3);
        assert!(actual.permissions.contains("view_cruddy"));
        assert_eq!(actual.permissions.len(), 1);
    }

    #[test]
    fn blank_colour_means_none() {
        let actual = info("Member", "   ").to_draft().unwrap();
        assert!(actual.color.is_none());
    }

    #[rstest]
    #[case::empty_name("", "")]
    #[case::blank_name("   ", "")]
    #[case::bad_colour("Member", "red")]
    #[case::short_colour("Member", "#fff")]
    #[case::colour_without_hash("Member", "ff00ff")]
    fn invalid_forms_are_rejected(#[case] name: &str, #[case] color: &str) {
        assert!(info(name, color).to_draft().is_err());
    }
}
