//! Endpoints of the collaborators grouped by collaborator. The session
//! endpoints live with the session store in the parent module.

mod admin;
mod attendance;
mod calendar_sync;
mod github;
mod project_board;
