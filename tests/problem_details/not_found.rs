//! tests/problem_details/not_found.rs
//! Ensures that hitting an unknown route returns a 404 problem.

#[path = "../mod.rs"]
mod common;

use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn returns_404_problem_for_nonexistent_route() {
    let base_url: String = common::spawn_app();

    let resp: reqwest::Response =
        common::get(&base_url, "/does-not-exist", "application/json").await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(common::content_type(&resp), "application/problem+json");

    let json: Value = serde_json::from_str(&resp.text().await.unwrap()).unwrap();
    assert_eq!(json["title"], "Not Found");
    assert_eq!(json["detail"], "Cannot GET /does-not-exist!");
}
