use emuy_shared::admin::AdminUser;
use serde_json::json;

pub use emuy_test_helper::{
    me_authenticated, me_unauthenticated, no_cb, spawn_app, spawn_app_with, TestApp,
};

pub fn admin_user(id: &str, username: &str) -> AdminUser {
    serde_json::from_value(json!({
        "id": id,
        "username": username,
        "roles": [],
        "banned": false
    }))
    .expect("invalid test user")
}
