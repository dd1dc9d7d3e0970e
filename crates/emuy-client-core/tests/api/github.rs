use crate::helpers::{no_cb, spawn_app};
use emuy_shared::{
    errors::RequestError,
    github::{CompareStatus, MergeOutcome},
};

#[tokio::test]
async fn compare_gives_diff_summary() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let actual = app
        .client
        .compare_branches("main", "dev", no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    let summary = actual.summary();
    assert_eq!(summary.status, CompareStatus::Ahead);
    assert_eq!(summary.files_changed, 2);
    assert_eq!((summary.additions, summary.deletions), (8, 4));
    assert!(summary.can_merge());
    assert_eq!(
        app.stub
            .request_count("GET /repos/emuy/emuy-tools/compare/main...dev"),
        1
    );
}

#[tokio::test]
async fn merge_without_token_is_not_sent() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let actual = app
        .client
        .merge_branches("main", "dev", no_cb)
        .await
        .unwrap();

    // Assert
    assert!(matches!(actual, Err(RequestError::NotConfigured(_))));
    assert_eq!(
        app.stub.request_count("POST /repos/emuy/emuy-tools/merges"),
        0
    );
}

#[tokio::test]
async fn merge_with_token_sends_bearer() {
    // Arrange
    let app = spawn_app().await;
    app.client
        .set_github_token(Some("ghp_test".to_string().into()));

    // Act
    let actual = app
        .client
        .merge_branches("main", "dev", no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(
        actual,
        MergeOutcome::Merged {
            sha: "abcdef0123456789".to_string()
        }
    );
    assert_eq!(
        app.stub.last_authorization.lock().unwrap().as_deref(),
        Some("Bearer ghp_test")
    );
}

#[tokio::test]
async fn clearing_token_stops_sending_it() {
    // Arrange
    let app = spawn_app().await;
    app.client
        .set_github_token(Some("ghp_test".to_string().into()));
    app.client.set_github_token(None);

    // Act
    app.client
        .compare_branches("main", "dev", no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert!(!app.client.has_github_token());
    assert!(app.stub.last_authorization.lock().unwrap().is_none());
}
