use strum::IntoEnumIterator as _;

use crate::uac::{PageAccess, Permission};

/// Every page of the dashboard
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::EnumIter,
    strum::Display,
)]
pub enum Route {
    Landing,
    Dashboard,
    Admin,
    #[strum(to_string = "DevOps")]
    DevOps,
    #[strum(to_string = "Cruddy Panel")]
    CruddyPanel,
    Profile,
    Architecture,
}

impl Route {
    /// Where denied pages send the user
    pub const FALLBACK: Self = Self::Landing;

    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Dashboard => "/dashboard",
            Route::Admin => "/admin",
            Route::DevOps => "/devops",
            Route::CruddyPanel => "/cruddy-panel",
            Route::Profile => "/profile",
            Route::Architecture => "/architecture",
        }
    }

    pub fn access(&self) -> PageAccess {
        match self {
            Route::Landing => PageAccess::Public,
            Route::Dashboard | Route::Profile | Route::Architecture => PageAccess::Authenticated,
            Route::Admin => PageAccess::Admin,
            Route::DevOps => PageAccess::AdminOr(Permission::VIEW_DEVOPS),
            Route::CruddyPanel => PageAccess::AdminOr(Permission::VIEW_CRUDDY),
        }
    }

    /// Trailing slashes are ignored, unknown paths give `None`
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        Self::iter().find(|route| route.path() == normalized)
    }
}
