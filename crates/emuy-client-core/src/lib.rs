//! Talks to the Emuy collaborators on behalf of the dashboard and owns the
//! session store.
//! NB: The assumption is made that the async runtime has already been started
//! before any functions from this library are called

#![warn(unused_crate_dependencies)]

mod client;
mod configuration;

pub use client::{health::HealthMonitor, Client, ResponseReceiver, UiCallBack};
pub use configuration::{
    get_configuration, AdminSettings, ClientConfiguration, GitHubSettings, HealthSettings,
    HealthTarget, ProjectBoardSettings, ServiceUrls,
};

#[cfg(test)] // Only used by the integration tests
mod warning_suppress {
    use emuy_test_helper as _;
    use serde_json as _;
    use tokio as _;
}
