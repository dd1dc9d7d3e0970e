use std::{
    borrow::{Borrow, Cow},
    collections::BTreeSet,
    fmt::{Debug, Display},
};

/// Opaque capability token issued by the auth service (for example
/// `view_cruddy`). Only set membership matters, there is no hierarchy.
#[derive(serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    /// Grants the admin area. Holding it (or being super admin) is what makes a
    /// user an admin.
    pub const VIEW_ADMIN: Self = Self::from_static("view_admin");
    pub const VIEW_CRUDDY: Self = Self::from_static("view_cruddy");
    pub const VIEW_DEVOPS: Self = Self::from_static("view_devops");

    pub const fn from_static(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Permission {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl From<&str> for Permission {
    fn from(value: &str) -> Self {
        value.to_string().into()
    }
}

impl Borrow<str> for Permission {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Debug for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Permissions(pub BTreeSet<Permission>);

impl Permissions {
    /// Plain set membership. Super admin overrides are applied by
    /// [`crate::uac::Session::has_permission`], not here.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.0.iter()
    }
}

impl From<Vec<Permission>> for Permissions {
    fn from(value: Vec<Permission>) -> Self {
        Self(value.into_iter().collect())
    }
}

impl<S: Into<String>> FromIterator<S> for Permissions {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|x| Permission::from(x.into()))
                .collect(),
        )
    }
}

impl Debug for Permissions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Permissions").field(&self.0).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::empty("[]", vec![])]
    #[case::single(r#"["view_cruddy"]"#, vec!["view_cruddy"])]
    #[case::duplicates_collapse(r#"["view_devops","view_devops"]"#, vec!["view_devops"])]
    #[case::unknown_tokens_kept(r#"["manage_bingo","view_admin"]"#, vec!["manage_bingo", "view_admin"])]
    fn permissions_from_json(#[case] json: &str, #[case] expected: Vec<&str>) {
        // Arrange
        let expected: Permissions = expected.into_iter().collect();

        // Act
        let actual: Permissions = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(actual, expected);
    }

    #[test]
    fn constant_and_owned_permission_are_equal() {
        let owned = Permission::from("view_admin".to_string());
        assert_eq!(owned, Permission::VIEW_ADMIN);

        let set: Permissions = vec![owned].into();
        assert!(set.contains("view_admin"));
        assert!(!set.contains("view_devops"));
    }
}
