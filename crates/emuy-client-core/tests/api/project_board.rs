use crate::helpers::{no_cb, spawn_app, spawn_app_with};
use emuy_shared::errors::RequestError;

#[tokio::test]
async fn board_needs_a_token() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let actual = app.client.project_board(no_cb).await.unwrap();

    // Assert
    assert!(matches!(actual, Err(RequestError::NotConfigured(_))));
    assert_eq!(app.stub.request_count("POST /graphql"), 0);
}

#[tokio::test]
async fn board_needs_a_project_id() {
    // Arrange
    let app = spawn_app_with(|c| c.project_board.project_id = String::new()).await;
    app.client
        .set_github_token(Some("ghp_test".to_string().into()));

    // Act
    let actual = app.client.project_board(no_cb).await.unwrap();

    // Assert
    assert!(matches!(actual, Err(RequestError::NotConfigured(_))));
}

#[tokio::test]
async fn board_items_are_grouped_by_status() {
    // Arrange
    let app = spawn_app().await;
    app.client
        .set_github_token(Some("ghp_test".to_string().into()));

    // Act
    let actual = app.client.project_board(no_cb).await.unwrap().unwrap();

    // Assert
    let columns: Vec<(&str, usize)> = actual
        .iter()
        .map(|c| (c.status.as_str(), c.items.len()))
        .collect();
    assert_eq!(columns, [("Todo", 2), ("Done", 1)]);
}
