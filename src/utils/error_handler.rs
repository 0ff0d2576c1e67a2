// Global error handling for tower middleware layers

use std::error::Error;

use axum::BoxError;
// tower's error type for timeouts
use tower::timeout::error::Elapsed;

use crate::problem::{Failure, Problem};

/// Maps layer errors to structured problems.
///
/// The returned failure is rendered by the problem details middleware sitting
/// above `HandleErrorLayer`; without it the client gets a bare 500.
///
/// Oversized bodies never get here: `DefaultBodyLimit` only limits extractors,
/// which answer with their own 413 rejection.
pub async fn handle_global_error(err: BoxError) -> Failure {
    // 408 if the request took too long
    if err.is::<Elapsed>() || find_cause::<Elapsed>(&*err).is_some() {
        return Problem::new(408, "Request took too long to complete").into();
    }

    // Otherwise, an opaque 500 with the error chain attached
    Failure::from_boxed(err)
}

/// Helper function to find specific error type in error chain
pub fn find_cause<T: Error + 'static>(err: &dyn Error) -> Option<&T> {
    let mut source: Option<&dyn Error> = err.source();

    while let Some(s) = source {
        if let Some(typed) = s.downcast_ref::<T>() {
            return Some(typed);
        }
        source = s.source();
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("wrapped")]
    struct Wrapper(#[source] Elapsed);

    #[tokio::test]
    async fn timeouts_map_to_408() {
        let failure = handle_global_error(Box::new(Elapsed::new())).await;
        assert!(matches!(failure, Failure::Problem(p) if p.status == 408));
    }

    #[tokio::test]
    async fn wrapped_timeouts_map_to_408() {
        let failure = handle_global_error(Box::new(Wrapper(Elapsed::new()))).await;
        assert!(matches!(failure, Failure::Problem(p) if p.status == 408));
    }

    #[tokio::test]
    async fn other_errors_stay_opaque() {
        let failure = handle_global_error("connection reset".into()).await;

        let Failure::Opaque(record) = failure else {
            panic!("expected an opaque failure");
        };
        assert_eq!(record.message, "connection reset");
    }

    #[test]
    fn find_cause_walks_the_source_chain() {
        let err = Wrapper(Elapsed::new());
        assert!(find_cause::<Elapsed>(&err).is_some());
        assert!(find_cause::<std::io::Error>(&err).is_none());
    }
}
