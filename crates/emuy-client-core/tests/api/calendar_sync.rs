use crate::helpers::{no_cb, spawn_app};

#[tokio::test]
async fn status_and_config_are_read() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let status = app.client.sync_status(no_cb).await.unwrap().unwrap();
    let config = app.client.sync_config(no_cb).await.unwrap().unwrap();

    // Assert
    assert!(!status.running);
    assert_eq!(status.events_synced, Some(12));
    assert!(config.enabled);
    assert_eq!(config.interval_minutes, Some(15));
}

#[tokio::test]
async fn manual_sync_returns_report() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let actual = app.client.trigger_sync(no_cb).await.unwrap().unwrap();

    // Assert
    assert_eq!(actual.total_changes(), 3);
    assert!(actual.is_clean());
    assert_eq!(app.stub.request_count("POST /sync"), 1);
}
