use crate::helpers::{me_authenticated, me_unauthenticated, no_cb, spawn_app, spawn_app_with};
use emuy_shared::{
    routes::Route,
    uac::{evaluate_guard, GuardOutcome, Session},
};
use serde_json::json;

#[tokio::test]
async fn initialize_populates_session() {
    // Arrange
    let app = spawn_app().await;
    app.stub.set_me(200, me_authenticated(&["view_cruddy"], false));

    // Act
    let actual = app
        .client
        .initialize(no_cb)
        .await
        .expect("failed to receive on rx");

    // Assert
    assert!(!actual.loading);
    let user = actual.user.as_ref().expect("should be logged in");
    assert_eq!(user.username.as_ref(), "emuy");
    assert_eq!(user.name_to_show(), "Emuy");
    assert_eq!(actual.roles.len(), 2);
    assert!(actual.has_permission("view_cruddy"));
    assert!(!actual.is_admin());
    assert_eq!(app.client.session(), actual);
}

#[tokio::test]
async fn unauthenticated_response_gives_logged_out_session() {
    // Arrange
    let app = spawn_app().await;
    app.stub.set_me(200, me_unauthenticated());

    // Act
    let actual = app.client.initialize(no_cb).await.unwrap();

    // Assert
    assert_eq!(*actual, Session::logged_out());
}

#[tokio::test]
async fn error_status_gives_logged_out_session() {
    // Arrange
    let app = spawn_app().await;
    app.stub.set_me(500, json!({"error": "boom"}));

    // Act
    let actual = app.client.initialize(no_cb).await.unwrap();

    // Assert
    assert_eq!(*actual, Session::logged_out());
}

#[tokio::test]
async fn malformed_body_gives_logged_out_session() {
    // Arrange
    let app = spawn_app().await;
    app.stub.set_me(200, json!("not a session"));

    // Act
    let actual = app.client.initialize(no_cb).await.unwrap();

    // Assert
    assert_eq!(*actual, Session::logged_out());
}

#[tokio::test]
async fn unreachable_auth_service_gives_logged_out_session() {
    // Arrange
    let app = spawn_app_with(|c| c.services.auth = "http://127.0.0.1:1".to_string()).await;

    // Act
    let actual = app.client.initialize(no_cb).await.unwrap();

    // Assert
    assert_eq!(*actual, Session::logged_out());
}

#[tokio::test]
async fn repeated_initialize_is_idempotent_with_one_call_each() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let first = app.client.initialize(no_cb).await.unwrap();
    let second = app.client.initialize(no_cb).await.unwrap();

    // Assert
    assert_eq!(first, second);
    assert_eq!(app.stub.request_count("GET /auth/me"), 2);
}

#[tokio::test]
async fn refresh_picks_up_new_permissions() {
    // Arrange
    let app = spawn_app().await;
    app.stub.set_me(200, me_authenticated(&[], false));
    let before = app.client.initialize(no_cb).await.unwrap();
    app.stub.set_me(200, me_authenticated(&["view_devops"], false));

    // Act
    let after = app.client.refresh(no_cb).await.unwrap();

    // Assert
    assert!(!before.has_permission("view_devops"));
    assert!(after.has_permission("view_devops"));
    assert!(app.client.session().has_permission("view_devops"));
}

#[tokio::test]
async fn guard_follows_loaded_session() {
    // Arrange
    let app = spawn_app().await;
    app.stub.set_me(200, me_authenticated(&["view_cruddy"], false));

    // Assert - Nothing decided while loading
    assert_eq!(
        evaluate_guard(&app.client.session(), &Route::Admin.access()),
        GuardOutcome::Loading
    );

    // Act
    let session = app.client.initialize(no_cb).await.unwrap();

    // Assert
    assert_eq!(
        evaluate_guard(&session, &Route::CruddyPanel.access()),
        GuardOutcome::Allowed
    );
    assert_eq!(
        evaluate_guard(&session, &Route::Admin.access()),
        GuardOutcome::Denied {
            redirect: Route::Landing
        }
    );
}

#[tokio::test]
async fn super_admin_is_allowed_everywhere() {
    // Arrange
    let app = spawn_app().await;
    app.stub.set_me(200, me_authenticated(&[], true));

    // Act
    let session = app.client.initialize(no_cb).await.unwrap();

    // Assert
    for route in [Route::Admin, Route::DevOps, Route::CruddyPanel, Route::Profile] {
        assert!(
            evaluate_guard(&session, &route.access()).is_allowed(),
            "{route}"
        );
    }
}
