use reqwest::Method;
use std::borrow::Cow;

/// The external collaborators the client talks to. Each has its own base url
/// in the client configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum Service {
    Auth,
    Attendance,
    #[strum(to_string = "Calendar Sync")]
    CalendarSync,
    GitHub,
    /// GraphQL endpoint serving the project board
    #[strum(to_string = "Project Board")]
    ProjectBoard,
}

#[derive(Debug, Clone)]
pub struct PathSpec {
    pub service: Service,
    pub method: Method,
    path: Cow<'static, str>,
}

impl PathSpec {
    pub const fn get(service: Service, path: &'static str) -> Self {
        Self {
            service,
            method: Method::GET,
            path: Cow::Borrowed(path),
        }
    }

    pub const fn post(service: Service, path: &'static str) -> Self {
        Self {
            service,
            method: Method::POST,
            path: Cow::Borrowed(path),
        }
    }

    /// For paths that embed identifiers
    pub fn dynamic(service: Service, method: Method, path: String) -> Self {
        Self {
            service,
            method,
            path: Cow::Owned(path),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}
