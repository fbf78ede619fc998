//! Analytics endpoints over uploaded data.

use axum::http::StatusCode;
use integration_tests::{
    fixtures,
    setup::{upload, TestContext},
};
use serde_json::json;

#[tokio::test]
async fn test_empty_store_summary() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/summary").await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "total_enrolments": 0,
        "total_0_5": 0,
        "total_5_17": 0,
        "total_17_plus": 0,
        "top_state": "N/A"
    }));
}

#[tokio::test]
async fn test_summary_picks_top_state() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = fixtures::csv(
        fixtures::MODERN_HEADER,
        &[
            "01-01-2024,A,X,,1,2,0",
            "01-01-2024,B,Y,,0,0,5",
        ],
    );
    upload(&server, "two.csv", body).await.assert_status_ok();

    let summary: serde_json::Value = server.get("/summary").await.json();
    assert_eq!(summary["total_enrolments"], 8);
    assert_eq!(summary["total_0_5"], 1);
    assert_eq!(summary["total_5_17"], 2);
    assert_eq!(summary["total_17_plus"], 5);
    assert_eq!(summary["top_state"], "B");
}

#[tokio::test]
async fn test_anomalies_default_threshold() {
    let ctx = TestContext::new();
    let server = ctx.server();

    upload(&server, "kerala.csv", fixtures::anomaly_rows()).await.assert_status_ok();

    let rows: Vec<serde_json::Value> = server.get("/anomalies").await.json();
    let totals: Vec<u64> = rows
        .iter()
        .map(|r| r["total_enrolment"].as_u64().unwrap())
        .collect();

    assert_eq!(rows.len(), 2);
    assert!(totals.contains(&5));
    assert!(totals.contains(&9));
    assert!(rows.iter().all(|r| r["type"] == "Low Enrolment"));
}

#[tokio::test]
async fn test_anomalies_custom_threshold() {
    let ctx = TestContext::new();
    let server = ctx.server();

    upload(&server, "kerala.csv", fixtures::anomaly_rows()).await.assert_status_ok();

    let rows: Vec<serde_json::Value> = server
        .get("/anomalies")
        .add_query_param("threshold", 6)
        .await
        .json();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["district"], "Kochi");
}

#[tokio::test]
async fn test_age_comparison() {
    let ctx = TestContext::new();
    let server = ctx.server();

    upload(&server, "kerala.csv", fixtures::anomaly_rows()).await.assert_status_ok();

    let response = server.get("/age-comparison").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "age_0_5": 11, "age_5_17": 13, "age_17_plus": 15 }));
}

#[tokio::test]
async fn test_state_trends_filter() {
    let ctx = TestContext::new();
    let server = ctx.server();

    upload(&server, "multi.csv", fixtures::multi_state()).await.assert_status_ok();

    let rows: Vec<serde_json::Value> = server
        .get("/trends/state")
        .add_query_param("state", "Bihar")
        .await
        .json();

    assert_eq!(
        rows,
        vec![
            json!({ "date": "2024-02-01", "state": "Bihar", "enrolments": 17 }),
            json!({ "date": "2024-02-02", "state": "Bihar", "enrolments": 3 }),
        ]
    );
}

#[tokio::test]
async fn test_district_trends_span_states() {
    let ctx = TestContext::new();
    let server = ctx.server();

    upload(&server, "multi.csv", fixtures::multi_state()).await.assert_status_ok();

    let rows: Vec<serde_json::Value> = server
        .get("/trends/district")
        .add_query_param("district", "Aurangabad")
        .await
        .json();

    assert_eq!(
        rows,
        vec![json!({ "date": "2024-02-01", "district": "Aurangabad", "enrolments": 3 })]
    );
}

#[tokio::test]
async fn test_state_and_district_options() {
    let ctx = TestContext::new();
    let server = ctx.server();

    upload(&server, "multi.csv", fixtures::multi_state()).await.assert_status_ok();

    let states: Vec<String> = server.get("/options/states").await.json();
    assert_eq!(states, vec!["Assam", "Bihar"]);

    let districts: Vec<String> = server
        .get("/options/districts")
        .add_query_param("state", "Bihar")
        .await
        .json();
    assert_eq!(districts, vec!["Aurangabad", "Gaya", "Patna"]);

    let all: Vec<String> = server.get("/options/districts").await.json();
    assert_eq!(all, vec!["Aurangabad", "Gaya", "Kamrup", "Patna"]);

    let unknown: Vec<String> = server
        .get("/options/districts")
        .add_query_param("state", "Nowhere")
        .await
        .json();
    assert!(unknown.is_empty());
}

#[tokio::test]
async fn test_query_failure_returns_db_003() {
    let ctx = TestContext::new();
    let server = ctx.server();

    ctx.store.set_fail_reads(true);
    let response = server.get("/summary").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "DB_003");
}
