//! Shared items related to user account control

mod guard;
mod permissions;
mod role;
mod session;
mod user;

pub use guard::{evaluate_guard, GuardOutcome, PageAccess};
pub use permissions::{Permission, Permissions};
pub use role::{Role, RoleDraft, RoleId, RoleName};
pub use session::{MeResponse, Session};
pub use user::{DisplayName, UserId, UserIdentity, Username};
