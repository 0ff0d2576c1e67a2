// Library root: RFC 7807 problem details for axum applications

pub mod config;
pub mod core;
pub mod features;
pub mod middlewares;
pub mod problem;
pub mod trap;
pub mod utils;

pub use crate::config::environment::EnvironmentVariables;
pub use crate::config::state::AppState;
pub use crate::middlewares::problem_details_middleware;
pub use crate::problem::{Failure, Problem, ProblemResponseBuilder};
