//! tests/problem_details/negotiation.rs
//! The Accept header decides between JSON and XML problem bodies.

#[path = "../mod.rs"]
mod common;

use reqwest::StatusCode;

#[tokio::test]
async fn accept_header_selects_the_representation() {
    let base_url: String = common::spawn_app();

    let cases: [(&str, &str); 6] = [
        ("", "application/problem+json"),
        ("application/xml", "application/problem+xml"),
        ("application/vnd.api+xml", "application/problem+xml"),
        ("application/json", "application/problem+json"),
        ("application/vnd.api+json", "application/problem+json"),
        ("text/plain, application/xml;q=0.5", "application/problem+xml"),
    ];

    for (accept, expected) in cases {
        let resp: reqwest::Response = common::get(&base_url, "/panic", accept).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "Accept: {accept:?}");
        assert_eq!(common::content_type(&resp), expected, "Accept: {accept:?}");
    }
}

#[tokio::test]
async fn xml_bodies_use_the_problem_namespace() {
    let base_url: String = common::spawn_app();

    let resp: reqwest::Response = common::get(&base_url, "/problem", "application/xml").await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: String = resp.text().await.unwrap();
    assert!(body.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#), "{body}");
    assert!(body.contains(r#"<problem xmlns="urn:ietf:rfc:7807">"#), "{body}");
    assert!(body.contains("<balance>30</balance>"), "{body}");
    assert_eq!(body.matches("<accounts>").count(), 2, "{body}");
}

#[tokio::test]
async fn successful_responses_are_untouched() {
    let base_url: String = common::spawn_app();

    let resp: reqwest::Response = common::get(&base_url, "/hello", "application/json").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(common::content_type(&resp), "application/json");
}
