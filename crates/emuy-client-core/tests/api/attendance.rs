use crate::helpers::{no_cb, spawn_app};
use emuy_shared::{
    attendance::{AttendanceDraft, AttendanceStats, LeaderboardCount},
    errors::RequestError,
};

fn draft(name: &str, event: &str) -> AttendanceDraft {
    AttendanceDraft {
        name: name.to_string(),
        event: event.to_string(),
        time: None,
    }
}

#[tokio::test]
async fn create_update_delete_record() {
    // Arrange
    let app = spawn_app().await;

    // Act - Create
    let created = app
        .client
        .create_record(&draft("Alice", "Raid"), no_cb)
        .await
        .expect("failed to receive on rx")
        .unwrap();

    // Assert - Listed
    let records = app.client.list_records(no_cb).await.unwrap().unwrap();
    assert_eq!(records, vec![created.clone()]);

    // Act - Update
    let updated = app
        .client
        .update_record(created.id, &draft("Alice", "Skilling"), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.event, "Skilling");

    // Act - Delete
    app.client
        .delete_record(created.id, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert - Gone
    let records = app.client.list_records(no_cb).await.unwrap().unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn deleting_unknown_record_is_status_error() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let actual = app.client.delete_record(42, no_cb).await.unwrap();

    // Assert
    let err = actual.unwrap_err();
    assert_eq!(err.status_code(), Some(404));
    assert!(matches!(err, RequestError::Status { body, .. } if body.contains("record")));
}

#[tokio::test]
async fn stats_from_server_match_records() {
    // Arrange
    let app = spawn_app().await;
    for (name, event) in [("A", "E1"), ("A", "E2"), ("B", "E1")] {
        app.client
            .create_record(&draft(name, event), no_cb)
            .await
            .unwrap()
            .unwrap();
    }

    // Act
    let actual = app.client.attendance_stats(no_cb).await.unwrap().unwrap();

    // Assert
    assert_eq!(
        actual,
        AttendanceStats {
            total: 3,
            unique_names: 2,
            unique_events: 2
        }
    );
}

#[tokio::test]
async fn leaderboard_is_ranked_client_side() {
    // Arrange
    let app = spawn_app().await;
    *app.stub.leaderboard.lock().unwrap() = vec![
        LeaderboardCount {
            name: "C".to_string(),
            count: 3,
        },
        LeaderboardCount {
            name: "A".to_string(),
            count: 5,
        },
        LeaderboardCount {
            name: "B".to_string(),
            count: 5,
        },
    ];

    // Act
    let actual = app.client.leaderboard(no_cb).await.unwrap().unwrap();

    // Assert
    let ranked: Vec<(usize, &str, u64)> = actual
        .iter()
        .map(|e| (e.rank, e.name.as_str(), e.count))
        .collect();
    assert_eq!(ranked, [(1, "A", 5), (2, "B", 5), (3, "C", 3)]);
}

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    // Arrange
    let app = crate::helpers::spawn_app_with(|c| {
        c.services.attendance = "http://127.0.0.1:1".to_string()
    })
    .await;

    // Act
    let actual = app.client.list_records(no_cb).await.unwrap();

    // Assert
    assert!(matches!(actual, Err(RequestError::Transport(_))));
}
