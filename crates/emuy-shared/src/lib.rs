//! Data model and pure logic shared by the client core and the dashboard

#![warn(unused_crate_dependencies)]

pub mod admin;
pub mod architecture;
pub mod attendance;
pub mod calendar_sync;
pub mod const_config;
pub mod errors;
pub mod github;
pub mod health;
mod macros;
pub mod project_board;
pub mod req_args;
pub mod routes;
pub mod uac;

#[cfg(not(target_arch = "wasm32"))]
pub mod telemetry;

