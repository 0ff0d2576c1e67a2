// Application state management with singleton pattern

use std::sync::Arc;
use axum::extract::FromRef;
use once_cell::sync::Lazy;
use crate::config::environment::EnvironmentVariables;
use crate::problem::ProblemResponseBuilder;

// AppState singleton
#[derive(Debug, Clone)]
pub struct AppState {
    pub environment: Arc<EnvironmentVariables>,
    pub problem_builder: Arc<ProblemResponseBuilder>,
}

impl AppState {
    /// Creates the state for a given configuration
    pub fn new(environment: EnvironmentVariables) -> Self {
        let problem_builder: ProblemResponseBuilder =
            ProblemResponseBuilder::from_settings(&environment);

        Self {
            environment: Arc::new(environment),
            problem_builder: Arc::new(problem_builder),
        }
    }

    /// Returns the singleton instance, built from the process environment
    pub fn instance() -> anyhow::Result<&'static Self> {
        static INSTANCE: Lazy<anyhow::Result<AppState>> = Lazy::new(|| {
            let environment: EnvironmentVariables = EnvironmentVariables::instance()?.clone();
            Ok(AppState::new(environment))
        });

        INSTANCE
            .as_ref()
            .map_err(|err| anyhow::anyhow!("Failed to initialize AppState: {err:#}"))
    }
}

// Lets handlers and middlewares extract just the builder
impl FromRef<AppState> for Arc<ProblemResponseBuilder> {
    fn from_ref(state: &AppState) -> Self {
        state.problem_builder.clone()
    }
}
