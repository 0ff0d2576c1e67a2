//! tests/problem_details/production.rs
//! Outside debug mode opaque failures never leak their message or code.

#[path = "../mod.rs"]
mod common;

use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn panics_are_reported_without_detail() {
    let base_url: String = common::spawn_app();

    let resp: reqwest::Response = common::get(&base_url, "/panic", "application/json").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: String = resp.text().await.unwrap();
    assert!(!body.contains("Something went terribly wrong"));

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], 500);
    assert_eq!(json["title"], "Internal Server Error");
    assert_eq!(json["type"], "https://httpstatus.es/500");
    assert_eq!(json["detail"], "An unknown error occurred.");
    assert!(json.get("exception").is_none());
}

#[tokio::test]
async fn structured_problems_are_rendered_verbatim() {
    let base_url: String = common::spawn_app();

    let resp: reqwest::Response = common::get(&base_url, "/problem", "application/json").await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let json: Value = serde_json::from_str(&resp.text().await.unwrap()).unwrap();
    assert_eq!(json["title"], "You do not have enough credit.");
    assert_eq!(json["type"], "https://example.com/probs/out-of-credit");
    assert_eq!(json["detail"], "Your current balance is 30, but that costs 50.");
    assert_eq!(json["balance"], 30);
    assert_eq!(json["accounts"][1], "/account/67890");
}

#[tokio::test]
async fn trapped_errors_are_opaque() {
    let base_url: String = common::spawn_app();

    let resp: reqwest::Response = common::get(&base_url, "/trap", "application/json").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: String = resp.text().await.unwrap();
    assert!(!body.contains("Division by zero"));
}

#[tokio::test]
async fn custom_default_detail_is_used() {
    let base_url: String = common::spawn_app_with(problem_details_axum::EnvironmentVariables {
        default_detail_message: "Please try again later.".into(),
        ..Default::default()
    });

    let resp: reqwest::Response = common::get(&base_url, "/error", "application/json").await;
    let json: Value = serde_json::from_str(&resp.text().await.unwrap()).unwrap();

    assert_eq!(json["detail"], "Please try again later.");
}
