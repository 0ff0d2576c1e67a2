//! tests/problem_details/debug.rs
//! Debug mode exposes the failure and its causes.

#[path = "../mod.rs"]
mod common;

use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn chained_errors_list_their_causes() {
    let base_url: String = common::spawn_debug_app();

    let resp: reqwest::Response = common::get(&base_url, "/error", "application/json").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json: Value = serde_json::from_str(&resp.text().await.unwrap()).unwrap();
    assert_eq!(json["detail"], "Could not load the monthly report");
    assert_eq!(json["exception"]["message"], "Could not load the monthly report");
    assert!(json["exception"]["class"].as_str().unwrap().ends_with("ReportUnavailable"));
    assert_eq!(json["exception"]["stack"][0]["message"], "reports/2024-05.csv is missing");
    assert_eq!(json["exception"]["stack"][0]["class"], "std::io::Error");
}

#[tokio::test]
async fn panics_carry_their_message_and_location() {
    let base_url: String = common::spawn_debug_app();

    let resp: reqwest::Response = common::get(&base_url, "/panic", "application/json").await;
    let json: Value = serde_json::from_str(&resp.text().await.unwrap()).unwrap();

    assert_eq!(json["detail"], "Something went terribly wrong");
    assert_eq!(json["exception"]["class"], "panic");

    let file: &str = json["exception"]["file"].as_str().unwrap();
    assert!(file.ends_with("handler.rs"), "{json}");
    assert!(json["exception"]["line"].as_u64().is_some(), "{json}");
}

#[tokio::test]
async fn trapped_errors_carry_their_location() {
    let base_url: String = common::spawn_debug_app();

    let resp: reqwest::Response = common::get(&base_url, "/trap", "application/xml").await;
    assert_eq!(common::content_type(&resp), "application/problem+xml");

    let body: String = resp.text().await.unwrap();
    assert!(body.contains("<detail>Division by zero</detail>"), "{body}");
    assert!(body.contains("<class>TrappedError</class>"), "{body}");
    assert!(body.contains("handler.rs</file>"), "{body}");
}
