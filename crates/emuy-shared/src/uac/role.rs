use std::ops::Deref;

use egui::WidgetText;
use serde::{Deserialize, Serialize};

use crate::errors::ConversionError;

use super::Permissions;

/// Display metadata for a role. `priority` does not drive any access decision,
/// it only orders roles for display (highest first).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: RoleId,
    pub name: RoleName,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub priority: i32,
}

/// Sent to the auth service to create a role
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RoleDraft {
    pub name: RoleName,
    pub color: Option<String>,
    pub priority: i32,
    pub permissions: Permissions,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct RoleId(String);

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct RoleName(String);

impl RoleName {
    pub const MAX_LENGTH: usize = 100;
}

impl Role {
    /// Parses a `#rrggbb` colour. Anything else (including no colour) gives
    /// `None` and the UI falls back to the default text colour.
    pub fn color_rgb(&self) -> Option<[u8; 3]> {
        let hex = self.color.as_deref()?.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some([channel(0)?, channel(2)?, channel(4)?])
    }

    /// Sorts by descending priority, keeping the input order for equal
    /// priorities
    pub fn sort_for_display(roles: &mut [Role]) {
        roles.sort_by(|a, b| b.priority.cmp(&a.priority));
    }
}

impl From<String> for RoleId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RoleId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for RoleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RoleName {
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

impl From<RoleName> for String {
    fn from(value: RoleName) -> Self {
        value.0
    }
}

impl From<&RoleName> for WidgetText {
    fn from(value: &RoleName) -> Self {
        (&value.0).into()
    }
}

impl Deref for RoleName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0[..]
    }
}
