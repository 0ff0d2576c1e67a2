//! tests/problem_details/pass_through.rs
//! A client that accepts no problem representation is left alone.

#[path = "../mod.rs"]
mod common;

use reqwest::StatusCode;

#[tokio::test]
async fn panics_escape_when_nothing_is_negotiable() {
    let base_url: String = common::spawn_app();

    let result: Result<reqwest::Response, reqwest::Error> = reqwest::Client::new()
        .get(format!("{base_url}/panic"))
        .header("accept", "text/html")
        .send()
        .await;

    // The connection is dropped instead of answered.
    assert!(result.is_err());
}

#[tokio::test]
async fn unknown_routes_get_a_bare_404() {
    let base_url: String = common::spawn_app();

    let resp: reqwest::Response = common::get(&base_url, "/does-not-exist", "text/html").await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.headers().get("content-type").is_none());
}
