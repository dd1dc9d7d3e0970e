use crate::helpers::{no_cb, spawn_app};
use emuy_client_core::{HealthMonitor, HealthTarget};
use emuy_shared::health::HealthStatus;
use std::time::Duration;

#[tokio::test]
async fn healthy_service_reports_healthy() {
    // Arrange
    let app = spawn_app().await;
    let config = app.client.config();
    let target = &config.health.services[0];

    // Act
    let actual = app.client.check_health(target, no_cb).await.unwrap();

    // Assert
    assert_eq!(actual.status, HealthStatus::Healthy);
    assert_eq!(actual.name, "Stub");
    assert_eq!(actual.url, format!("{}/health", app.address));
}

#[tokio::test]
async fn error_status_reports_unhealthy() {
    // Arrange
    let app = spawn_app().await;
    app.stub.set_health(503, Duration::ZERO);
    let config = app.client.config();
    let target = &config.health.services[0];

    // Act
    let actual = app.client.check_health(target, no_cb).await.unwrap();

    // Assert
    assert_eq!(actual.status, HealthStatus::Unhealthy { status: 503 });
}

#[tokio::test]
async fn slow_service_times_out() {
    // Arrange
    let app = spawn_app().await;
    app.stub.set_health(200, Duration::from_secs(3));
    let config = app.client.config();
    let target = &config.health.services[0];

    // Act
    let actual = app.client.check_health(target, no_cb).await.unwrap();

    // Assert
    assert_eq!(actual.status, HealthStatus::TimedOut);
}

#[tokio::test]
async fn closed_port_is_unreachable() {
    // Arrange
    let app = spawn_app().await;
    let target = HealthTarget {
        name: "Nothing".to_string(),
        url: "http://127.0.0.1:1".to_string(),
    };

    // Act
    let actual = app.client.check_health(&target, no_cb).await.unwrap();

    // Assert
    assert!(matches!(actual.status, HealthStatus::Unreachable(_)));
}

#[tokio::test]
async fn monitor_runs_one_round_per_interval() {
    // Arrange
    let app = spawn_app().await;
    let mut monitor = HealthMonitor::from_config(&app.client.config());

    // Act - First tick starts a round
    monitor.tick(&app.client, || no_cb);
    assert!(monitor.is_checking());
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(100)).await;
        monitor.tick(&app.client, || no_cb);
        if !monitor.is_checking() {
            break;
        }
    }
    let remaining = monitor.tick(&app.client, || no_cb);

    // Assert
    assert!(!monitor.is_checking());
    assert!(monitor.summary().all_healthy());
    assert_eq!(monitor.summary().total, 1);
    assert!(remaining.as_u64() > 0);
    assert_eq!(app.stub.request_count("GET /health"), 1);
}

#[tokio::test]
async fn check_now_starts_another_round() {
    // Arrange
    let app = spawn_app().await;
    let mut monitor = HealthMonitor::from_config(&app.client.config());
    monitor.tick(&app.client, || no_cb);
    while monitor.is_checking() {
        tokio::time::sleep(Duration::from_millis(50)).await;
        monitor.tick(&app.client, || no_cb);
    }

    // Act
    monitor.check_now();
    monitor.tick(&app.client, || no_cb);
    while monitor.is_checking() {
        tokio::time::sleep(Duration::from_millis(50)).await;
        monitor.tick(&app.client, || no_cb);
    }

    // Assert
    assert_eq!(app.stub.request_count("GET /health"), 2);
}
