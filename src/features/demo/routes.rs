// Start of file: /src/features/demo/routes.rs

/*
    * Demo endpoints, one per kind of outcome the problem details middleware handles:
    * success, panic, structured problem, trapped runtime error and chained error.
*/

use axum::{routing::get, Router};

use crate::config::state::AppState;
use crate::features::demo::handler::{
    chained_error_handler, hello_handler, panic_handler, problem_handler, trap_handler,
};

pub fn demo_routes() -> Router<AppState> {
    Router::new()
        .route("/hello", get(hello_handler))
        .route("/panic", get(panic_handler))
        .route("/problem", get(problem_handler))
        .route("/trap", get(trap_handler))
        .route("/error", get(chained_error_handler))
}

// End of file: /src/features/demo/routes.rs
