// Start of file: /src/features/demo/handler.rs

/*
    * Handlers behind the demo routes. Every one of them except `hello_handler`
    * ends in a failure the problem details middleware turns into a response.
*/

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::config::state::AppState;
use crate::problem::{Failure, Problem};
use crate::trap::{self, Severity};

#[derive(Debug, thiserror::Error)]
#[error("Could not load the monthly report")]
pub struct ReportUnavailable(#[source] pub std::io::Error);

#[tracing::instrument(skip(state))]
pub async fn hello_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let body: Value = json!({
        "message": "Hello from Axum!",
        "environment": state.environment.environment,
    });
    (StatusCode::OK, Json(body))
}

pub async fn panic_handler() -> Json<Value> {
    panic!("Something went terribly wrong")
}

pub async fn problem_handler() -> Result<Json<Value>, Failure> {
    Err(Problem::new(403, "Your current balance is 30, but that costs 50.")
        .with_title("You do not have enough credit.")
        .with_type("https://example.com/probs/out-of-credit")
        .with_extension("balance", 30)
        .with_extension("accounts", json!(["/account/12345", "/account/67890"]))
        .into())
}

pub async fn trap_handler() -> Result<Json<Value>, Failure> {
    let divisor: i64 = 0;
    if divisor == 0 {
        trap::raise(Severity::WARNING, "Division by zero")?;
    }
    Ok(Json(json!({ "result": divisor })))
}

pub async fn chained_error_handler() -> Result<Json<Value>, Failure> {
    let cause: std::io::Error =
        std::io::Error::new(std::io::ErrorKind::NotFound, "reports/2024-05.csv is missing");
    Err(Failure::from_error(&ReportUnavailable(cause)))
}

// End of file: /src/features/demo/handler.rs
