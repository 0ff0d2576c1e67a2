// Start of file: src/main.rs

use axum::{serve, Router};
use tokio::net::TcpListener;
use tracing::info;

use problem_details_axum::config::state::AppState;
use problem_details_axum::core::{
    logging::init_tracing,
    server::{create_app, setup_listener, shutdown_signal},
};
use problem_details_axum::trap;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // set up logging
    init_tracing();

    let state: AppState = AppState::instance()?.clone();

    // panics are logged through tracing and located in debug problem bodies
    trap::install_panic_hook();
    trap::set_error_reporting(state.environment.error_reporting);

    let listener: TcpListener = setup_listener(&state.environment).await?;
    let app: Router = create_app(state);

    info!("Server listening on: {}", listener.local_addr()?);

    serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

// End of file: src/main.rs
