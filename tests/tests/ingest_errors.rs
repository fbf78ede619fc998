//! Tests for error handling on the upload and reset paths.

use axum::http::StatusCode;
use integration_tests::{
    fixtures,
    setup::{upload, TestContext},
};

#[tokio::test]
async fn test_non_csv_upload_returns_valid_003() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = upload(&server, "data.xlsx", fixtures::modern_pair()).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_003");
    assert!(ctx.store.records().await.is_empty());
}

#[tokio::test]
async fn test_undecodable_upload_returns_valid_001() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let part = axum_test::multipart::Part::bytes(vec![0xff, 0xfe, 0x00, 0xc3, 0x28])
        .file_name("broken.csv");
    let response = server
        .post("/upload")
        .multipart(axum_test::multipart::MultipartForm::new().add_part("file", part))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_001");
    assert!(ctx.store.records().await.is_empty());
}

#[tokio::test]
async fn test_missing_file_field_returns_400() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/upload")
        .multipart(axum_test::multipart::MultipartForm::new().add_text("note", "no file"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_001");
}

#[tokio::test]
async fn test_store_failure_returns_db_001_and_persists_nothing() {
    let ctx = TestContext::new();
    let server = ctx.server();

    ctx.store.set_fail_writes(true);
    let response = upload(&server, "goa.csv", fixtures::modern_pair()).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "DB_001");

    ctx.store.set_fail_writes(false);
    assert!(ctx.store.records().await.is_empty());
}

#[tokio::test]
async fn test_clear_failure_returns_db_002() {
    let ctx = TestContext::new();
    let server = ctx.server();

    upload(&server, "goa.csv", fixtures::modern_pair()).await.assert_status_ok();
    ctx.store.set_fail_writes(true);

    let response = server.delete("/clear-data").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "DB_002");
    assert_eq!(ctx.store.records().await.len(), 2);
}
