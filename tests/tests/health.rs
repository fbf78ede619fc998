//! Health, metrics and welcome endpoints.

use integration_tests::{
    fixtures,
    setup::{upload, TestContext},
};

#[tokio::test]
async fn test_root_welcome() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["message"].as_str().unwrap().starts_with("Welcome"));
}

#[tokio::test]
async fn test_health_reports_store() {
    let ctx = TestContext::new();
    let server = ctx.server();
    upload(&server, "goa.csv", fixtures::modern_pair()).await.assert_status_ok();

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["store_connected"], true);
    assert_eq!(body["records"], 2);
}

#[tokio::test]
async fn test_health_and_readiness_follow_store_outage() {
    let ctx = TestContext::new();
    let server = ctx.server();

    ctx.store.set_offline(true);
    let body: serde_json::Value = server.get("/health").await.json();
    assert_eq!(body["store_connected"], false);
    assert_eq!(body["status"], "unhealthy");

    ctx.store.set_offline(false);
    let body: serde_json::Value = server.get("/health").await.json();
    assert_eq!(body["store_connected"], true);
    server.get("/health/ready").await.assert_status_ok();
}

#[tokio::test]
async fn test_liveness_probe() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server.get("/health/live").await.assert_status_ok();
}

#[tokio::test]
async fn test_metrics_snapshot_counts_uploads() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let before: serde_json::Value = server.get("/metrics").await.json();
    upload(&server, "mixed.csv", fixtures::with_defects()).await.assert_status_ok();
    let after: serde_json::Value = server.get("/metrics").await.json();

    let delta = |key: &str| after[key].as_u64().unwrap() - before[key].as_u64().unwrap();
    assert!(delta("uploads_received") >= 1);
    assert!(delta("rows_received") >= 8);
    assert!(delta("rows_discarded") >= 6);
}
