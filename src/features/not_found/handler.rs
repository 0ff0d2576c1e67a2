// Start of file: /src/features/not_found/handler.rs

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::Map;
use tracing::error;

use crate::problem::{can_negotiate, ProblemResponseBuilder};

/// Router fallback: a 404 problem naming the method and URI, or a bare 404
/// when the client accepts no problem representation.
pub async fn not_found_handler(
    State(builder): State<Arc<ProblemResponseBuilder>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if !can_negotiate(&headers) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let detail: String = format!("Cannot {method} {uri}!");

    match builder.build(&headers, 404, detail, None, None, Map::new()) {
        Ok(response) => response,
        Err(err) => {
            error!("Could not render not found problem: {err}");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}


// End of file: /src/features/not_found/handler.rs
