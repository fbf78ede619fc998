//! Registry sync through POST /sync-api with a scripted page source.

use axum::http::StatusCode;
use integration_tests::{fixtures, mocks::MockPage, setup::TestContext};

fn page(rows: &[&str]) -> String {
    fixtures::csv(fixtures::MODERN_HEADER, rows)
}

#[tokio::test]
async fn test_single_page_sync() {
    let ctx = TestContext::new();
    let server = ctx.server();
    ctx.source.push_body(fixtures::modern_pair());
    ctx.source.push_body(fixtures::modern_pair());

    let response = server.post("/sync-api").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Successfully synced 2 records from API.");
    assert_eq!(ctx.source.queries().len(), 1);
    assert_eq!(ctx.source.queries()[0].limit, 100);
    assert_eq!(ctx.source.queries()[0].offset, 0);
    assert_eq!(ctx.store.records().await.len(), 2);
}

#[tokio::test]
async fn test_fetch_all_pages_until_empty() {
    let ctx = TestContext::new();
    let server = ctx.server();
    ctx.source.push_body(page(&["01-01-2024,Goa,Panaji,,1,1,1", "02-01-2024,Goa,Panaji,,1,1,1"]));
    ctx.source.push_body(page(&["03-01-2024,Goa,Panaji,,1,1,1", "04-01-2024,Goa,Panaji,,1,1,1"]));
    ctx.source.push_body(page(&["05-01-2024,Goa,Panaji,,1,1,1"]));

    let response = server
        .post("/sync-api")
        .add_query_param("limit", 2)
        .add_query_param("state", "Goa")
        .add_query_param("fetch_all", true)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["message"],
        "Successfully synced 5 records from API with filters: state=Goa, FETCH_ALL=True."
    );

    let offsets: Vec<u64> = ctx.source.queries().iter().map(|q| q.offset).collect();
    assert_eq!(offsets, vec![0, 2, 4, 6]);
    assert!(ctx
        .source
        .queries()
        .iter()
        .all(|q| q.state.as_deref() == Some("Goa")));
    assert_eq!(ctx.store.records().await.len(), 5);
}

#[tokio::test]
async fn test_source_failure_keeps_committed_pages() {
    let ctx = TestContext::new();
    let server = ctx.server();
    ctx.source.push_body(fixtures::modern_pair());
    ctx.source.push(MockPage::Status(503));

    let response = server
        .post("/sync-api")
        .add_query_param("fetch_all", true)
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "SRC_002");
    assert_eq!(ctx.store.records().await.len(), 2);
}

#[tokio::test]
async fn test_unreachable_source_returns_src_001() {
    let ctx = TestContext::new();
    let server = ctx.server();
    ctx.source.push(MockPage::Unreachable);

    let response = server.post("/sync-api").await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "SRC_001");
    assert!(ctx.store.records().await.is_empty());
}

#[tokio::test]
async fn test_empty_first_page_syncs_nothing() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/sync-api")
        .add_query_param("fetch_all", true)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["records"], 0);
    assert_eq!(ctx.source.queries().len(), 1);
}

#[tokio::test]
async fn test_invalid_limit_rejected() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let zero = server.post("/sync-api").add_query_param("limit", 0).await;
    zero.assert_status(StatusCode::BAD_REQUEST);

    let garbage = server.post("/sync-api").add_query_param("limit", "many").await;
    garbage.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = garbage.json();
    assert_eq!(body["code"], "VALID_001");

    assert!(ctx.source.queries().is_empty());
}
