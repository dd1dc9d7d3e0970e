use anyhow::Context as _;
use emuy_shared::{const_config::path::Service, github::RepoRef};
use emuy_time::Seconds;
use serde_aux::field_attributes::deserialize_number_from_string;

/// Compiled in so the browser build has a configuration without a file system
const BASE_CONFIGURATION: &str = include_str!("../configuration/base.toml");

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ClientConfiguration {
    pub services: ServiceUrls,
    pub health: HealthSettings,
    pub github: GitHubSettings,
    pub project_board: ProjectBoardSettings,
    pub admin: AdminSettings,
}

/// Base url of each collaborator without a trailing slash
#[derive(serde::Deserialize, Clone, Debug)]
pub struct ServiceUrls {
    pub auth: String,
    pub attendance: String,
    pub calendar_sync: String,
    pub github: String,
    pub project_board: String,
    /// Where the auth service sends the browser back to after logout
    pub app_origin: String,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct HealthSettings {
    pub timeout_secs: Seconds,
    pub interval_secs: Seconds,
    pub services: Vec<HealthTarget>,
}

/// A service listed on the health grid
#[derive(serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HealthTarget {
    pub name: String,
    pub url: String,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct GitHubSettings {
    pub repo: RepoRef,
    pub base_branch: String,
    pub head_branch: String,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ProjectBoardSettings {
    /// Node id of the ProjectV2. Empty means only the embed link is shown.
    #[serde(default)]
    pub project_id: String,
    pub embed_url: String,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct AdminSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub activity_limit: u16,
}

impl ServiceUrls {
    pub fn base_url(&self, service: Service) -> &str {
        match service {
            Service::Auth => &self.auth,
            Service::Attendance => &self.attendance,
            Service::CalendarSync => &self.calendar_sync,
            Service::GitHub => &self.github,
            Service::ProjectBoard => &self.project_board,
        }
    }

    /// Points every collaborator at the same host
    pub fn all_at(address: &str) -> Self {
        Self {
            auth: address.to_string(),
            attendance: address.to_string(),
            calendar_sync: address.to_string(),
            github: address.to_string(),
            project_board: format!("{address}/graphql"),
            app_origin: address.to_string(),
        }
    }
}

impl ProjectBoardSettings {
    pub fn has_project_id(&self) -> bool {
        !self.project_id.trim().is_empty()
    }
}

/// Loads the compiled in base configuration. On native it is then overridden
/// by `configuration/local.toml` (if present) and by environment variables
/// with the prefix `EMUY` and `__` as separator, for example
/// `EMUY_SERVICES__AUTH=https://auth.example.com`.
pub fn get_configuration() -> anyhow::Result<ClientConfiguration> {
    let builder = config::Config::builder().add_source(config::File::from_str(
        BASE_CONFIGURATION,
        config::FileFormat::Toml,
    ));

    #[cfg(not(target_arch = "wasm32"))]
    let builder = builder
        .add_source(
            config::File::from(std::path::Path::new("configuration/local.toml")).required(false),
        )
        .add_source(
            config::Environment::with_prefix("EMUY")
                .prefix_separator("_")
                .separator("__"),
        );

    let settings = builder.build().context("failed to build configuration")?;
    let mut result = settings
        .try_deserialize::<ClientConfiguration>()
        .context("failed to deserialize configuration")?;
    result.normalize();
    Ok(result)
}

impl ClientConfiguration {
    fn normalize(&mut self) {
        for url in [
            &mut self.services.auth,
            &mut self.services.attendance,
            &mut self.services.calendar_sync,
            &mut self.services.github,
            &mut self.services.project_board,
            &mut self.services.app_origin,
        ] {
            trim_trailing_slash(url);
        }
        for target in self.health.services.iter_mut() {
            trim_trailing_slash(&mut target.url);
        }
    }
}

fn trim_trailing_slash(url: &mut String) {
    while url.ends_with('/') {
        url.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emuy_shared::const_config::health::{HEALTH_CHECK_TIMEOUT, HEALTH_POLL_INTERVAL};
    use strum::IntoEnumIterator as _;

    #[test]
    fn base_configuration_loads() {
        let actual = get_configuration().unwrap();
        assert_eq!(actual.health.timeout_secs, HEALTH_CHECK_TIMEOUT);
        assert_eq!(actual.health.interval_secs, HEALTH_POLL_INTERVAL);
        assert!(!actual.health.services.is_empty());
    }

    #[test]
    fn urls_are_absolute_without_trailing_slash() {
        let actual = get_configuration().unwrap();
        for service in Service::iter() {
            let url = actual.services.base_url(service);
            assert!(url.starts_with("http"), "{service}: {url}");
            assert!(!url.ends_with('/'), "{service}: {url}");
        }
    }

    #[test]
    fn trailing_slashes_removed() {
        let mut url = "http://localhost:8080//".to_string();
        trim_trailing_slash(&mut url);
        assert_eq!(url, "http://localhost:8080");
    }
}
