//! tests/mod.rs
//! A shared test helper to spawn the Axum app on an ephemeral port.

#![allow(dead_code)]

use axum::{serve, Router};
use tokio::net::TcpListener as TokioTcpListener;

use problem_details_axum::config::{environment::EnvironmentVariables, state::AppState};
use problem_details_axum::core::server::create_app;
use problem_details_axum::trap;

/// Spawns the app with production settings and returns its base URL.
pub fn spawn_app() -> String {
    spawn_app_with(EnvironmentVariables::default())
}

/// Spawns the app in debug mode (failure detail and exception records exposed).
pub fn spawn_debug_app() -> String {
    spawn_app_with(EnvironmentVariables {
        debug: true,
        ..EnvironmentVariables::default()
    })
}

/// Spawns the app on a random unused port and returns its base URL.
pub fn spawn_app_with(env: EnvironmentVariables) -> String {
    // * Build the application exactly like main() does.
    trap::install_panic_hook();
    let app: Router = create_app(AppState::new(env));

    // * Bind an ephemeral port using std::net::TcpListener.
    let std_listener: std::net::TcpListener = std::net::TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    std_listener.set_nonblocking(true).unwrap();

    // * Convert std::net::TcpListener to tokio::net::TcpListener.
    let tokio_listener: TokioTcpListener = TokioTcpListener::from_std(std_listener)
        .expect("Failed to convert to tokio listener");

    let addr: std::net::SocketAddr = tokio_listener.local_addr().unwrap();

    // * Spawn the server in a background task.
    tokio::spawn(async move {
        serve(tokio_listener, app)
            .await
            .expect("Server failed");
    });

    // * Return the base URL, e.g. "http://127.0.0.1:12345".
    format!("http://{}", addr)
}

/// GET `path` with the given Accept header (none when empty).
pub async fn get(base_url: &str, path: &str, accept: &str) -> reqwest::Response {
    let mut request: reqwest::RequestBuilder =
        reqwest::Client::new().get(format!("{base_url}{path}"));
    if !accept.is_empty() {
        request = request.header("accept", accept);
    }
    request.send().await.expect("Failed to execute request.")
}

pub fn content_type(resp: &reqwest::Response) -> String {
    resp.headers()["content-type"].to_str().unwrap().to_owned()
}
