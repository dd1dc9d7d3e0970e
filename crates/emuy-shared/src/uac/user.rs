use std::fmt::Display;

use egui::WidgetText;

use crate::errors::ConversionError;

#[derive(
    Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(transparent)]
pub struct UserId(String);

#[derive(
    Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(transparent)]
/// Represents a username and is constrained to not be an empty string
pub struct Username(String);

#[derive(Default, Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct DisplayName(String);

/// Who the auth service says is logged in
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub id: UserId,
    pub username: Username,
    #[serde(default)]
    pub display_name: Option<DisplayName>,
    /// Url (or hash) of the avatar image as provided by the auth service
    #[serde(default)]
    pub avatar: Option<String>,
}

impl UserIdentity {
    /// Display name if set otherwise the username
    pub fn name_to_show(&self) -> &str {
        match &self.display_name {
            Some(display_name) if !display_name.0.is_empty() => &display_name.0,
            _ => &self.username.0,
        }
    }
}

impl Username {
    pub const MAX_LENGTH: usize = 32;
}

impl DisplayName {
    pub const MAX_LENGTH: usize = 32;
}

impl TryFrom<String> for Username {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(ConversionError::Empty);
        }
        if value.len() > Self::MAX_LENGTH {
            return Err(ConversionError::MaxExceeded {
                max: Self::MAX_LENGTH,
                actual: value.len(),
            });
        }
        Ok(Self(value))
    }
}

impl TryFrom<&str> for Username {
    type Error = ConversionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.to_string().try_into()
    }
}

impl TryFrom<String> for DisplayName {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.len() > Self::MAX_LENGTH {
            return Err(ConversionError::MaxExceeded {
                max: Self::MAX_LENGTH,
                actual: value.len(),
            });
        }
        Ok(Self(value))
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for DisplayName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&Username> for WidgetText {
    fn from(value: &Username) -> Self {
        (&value.0).into()
    }
}

impl From<&DisplayName> for WidgetText {
    fn from(value: &DisplayName) -> Self {
        (&value.0).into()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::empty("", ConversionError::Empty)]
    #[case::too_long("a".repeat(33), ConversionError::MaxExceeded{max:32, actual:33})]
    fn illegal_username(#[case] name: String, #[case] expect: ConversionError) {
        // Act
        let actual: Result<Username, ConversionError> = name.try_into();

        // Assert
        assert_eq!(actual.unwrap_err(), expect);
    }

    #[rstest]
    #[case::display_name_set(r#"{"id":"1","username":"emuy","displayName":"Emuy"}"#, "Emuy")]
    #[case::display_name_empty(r#"{"id":"1","username":"emuy","displayName":""}"#, "emuy")]
    #[case::display_name_missing(r#"{"id":"1","username":"emuy"}"#, "emuy")]
    fn name_to_show(#[case] json: &str, #[case] expected: &str) {
        let identity: UserIdentity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.name_to_show(), expected);
    }
}
