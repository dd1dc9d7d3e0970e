mod admin;
mod attendance;
mod calendar_sync;
mod github;
mod health_check;
mod helpers;
mod project_board;
mod session;
