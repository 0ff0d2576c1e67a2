// Start of file: /src/middlewares/problem_details.rs

/*
    * Failure interceptor. Wraps the rest of the stack, installs a runtime-error
    * trap around it and turns every failure into a problem details response.
    *
    * A request whose Accept header cannot be satisfied with a problem
    * representation is passed through untouched: no trap, panics propagate.
*/

use std::{future::Future, panic::AssertUnwindSafe, sync::Arc};

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures::FutureExt;
use tracing::{debug, error};

use crate::problem::{
    can_negotiate, Failure, FailureRecord, ProblemError, ProblemResponseBuilder,
};
use crate::trap::{self, PanicSite};

/// What a downstream stage finished with.
///
/// A `Response` carrying a [`Failure`] in its extensions (see
/// `impl IntoResponse for Failure`) counts as that failure; `None` counts as
/// [`Failure::MissingResponse`].
pub trait Outcome {
    fn into_outcome(self) -> Result<Response, Failure>;
}

impl Outcome for Response<Body> {
    fn into_outcome(mut self) -> Result<Response, Failure> {
        match self.extensions_mut().remove::<Failure>() {
            Some(failure) => Err(failure),
            None => Ok(self),
        }
    }
}

impl<T: Outcome> Outcome for Option<T> {
    fn into_outcome(self) -> Result<Response, Failure> {
        self.ok_or(Failure::MissingResponse)?.into_outcome()
    }
}

impl<T: Outcome, E: Into<Failure>> Outcome for Result<T, E> {
    fn into_outcome(self) -> Result<Response, Failure> {
        self.map_err(Into::into)?.into_outcome()
    }
}

/// Runs `downstream` and renders any failure it ends with.
///
/// Only a builder configuration error is returned as `Err`; the trap is
/// restored before the builder runs.
pub async fn process<Fut>(
    builder: &ProblemResponseBuilder,
    headers: &HeaderMap,
    downstream: Fut,
) -> Result<Response, ProblemError>
where
    Fut: Future,
    Fut::Output: Outcome,
{
    if !can_negotiate(headers) {
        debug!("No problem representation is acceptable, passing the request through");
        return Ok(downstream.await.into_outcome().unwrap_or_else(IntoResponse::into_response));
    }

    // Fresh for every call, so only a panic raised while this downstream
    // runs can leave a location behind.
    let panic_site: Arc<PanicSite> = Arc::default();
    let trapped = trap::scope_with(panic_site.clone(), downstream);

    let failure: Failure = match AssertUnwindSafe(trapped).catch_unwind().await {
        Ok(outcome) => match outcome.into_outcome() {
            Ok(response) => return Ok(response),
            Err(failure) => failure,
        },
        Err(payload) => FailureRecord::from_panic(payload.as_ref(), panic_site.take()).into(),
    };

    error!(failure = ?failure, "Request failed, rendering problem details");

    builder.build_from_failure(headers, failure)
}

/// Axum adapter for [`process`].
///
/// ```ignore
/// Router::new()
///     .route("/", get(handler))
///     .layer(from_fn_with_state(builder, problem_details_middleware));
/// ```
pub async fn problem_details_middleware(
    State(builder): State<Arc<ProblemResponseBuilder>>,
    request: Request,
    next: Next,
) -> Response {
    let headers: HeaderMap = request.headers().clone();

    match process(&builder, &headers, next.run(request)).await {
        Ok(response) => response,
        Err(err) => {
            error!("Could not render problem details: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}


// End of file: /src/middlewares/problem_details.rs
