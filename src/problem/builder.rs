// Start of file: /src/problem/builder.rs

/*
    * Problem response builder.
    *
    * Turns problem values (or failures) into complete `http` responses. The
    * representation is negotiated from the request's Accept header: JSON when
    * the client accepts a JSON type, XML otherwise, including when negotiation
    * fails outright.
*/

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        HeaderMap, HeaderValue, Response, StatusCode, Version,
    },
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::environment::EnvironmentVariables;

use super::details::ProblemDetails;
use super::failure::{Failure, FailureRecord};
use super::json::{to_json_vec, JsonFlags};
use super::negotiation::{negotiate_format, ProblemFormat};
use super::xml::to_xml_string;

/// Detail shown for opaque failures when their message is not disclosed.
pub const DEFAULT_DETAIL_MESSAGE: &str = "An unknown error occurred.";

/// Produces the writable buffer each response body is written into.
/// Returning `None` is a configuration error.
pub type BodyFactory = Arc<dyn Fn() -> Option<Vec<u8>> + Send + Sync>;

/// Errors raised while building a problem response.
///
/// These are programming or configuration errors, never request failures:
/// callers should surface them rather than retry.
#[derive(Debug, thiserror::Error)]
pub enum ProblemError {
    #[error(
        "The factory for generating a problem details response body did not return a writable buffer"
    )]
    InvalidResponseBody,

    #[error("Failed to encode problem details as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to encode problem details as XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Failed to write problem details body: {0}")]
    Body(#[from] std::io::Error),
}

/// Builds Problem Details responses. Immutable once configured; share it
/// behind an `Arc`.
#[derive(Clone)]
pub struct ProblemResponseBuilder {
    debug: bool,
    json_flags: JsonFlags,
    prototype_headers: HeaderMap,
    prototype_version: Version,
    body_factory: BodyFactory,
    expose_failure_detail: bool,
    default_detail_message: String,
}

impl fmt::Debug for ProblemResponseBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProblemResponseBuilder")
            .field("debug", &self.debug)
            .field("json_flags", &self.json_flags)
            .field("expose_failure_detail", &self.expose_failure_detail)
            .field("default_detail_message", &self.default_detail_message)
            .finish_non_exhaustive()
    }
}

impl Default for ProblemResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProblemResponseBuilder {
    /// Production defaults: no debug details, opaque messages hidden, all
    /// JSON flags, empty prototype.
    pub fn new() -> Self {
        Self {
            debug: false,
            json_flags: JsonFlags::default(),
            prototype_headers: HeaderMap::new(),
            prototype_version: Version::default(),
            body_factory: Arc::new(|| Some(Vec::new())),
            expose_failure_detail: false,
            default_detail_message: DEFAULT_DETAIL_MESSAGE.to_owned(),
        }
    }

    /// Builder configured from the environment. The debug flag also exposes
    /// failure detail.
    pub fn from_settings(settings: &EnvironmentVariables) -> Self {
        Self::new()
            .with_debug(settings.debug)
            .with_expose_failure_detail(settings.debug || settings.expose_failure_detail)
            .with_json_flags(settings.json_flags)
            .with_default_detail_message(settings.default_detail_message.to_string())
    }

    /// Debug mode discloses opaque failure messages and codes and adds the
    /// `exception` record with its cause chain.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_json_flags(mut self, flags: JsonFlags) -> Self {
        self.json_flags = flags;
        self
    }

    /// Headers and version of `prototype` are copied into every response.
    pub fn with_response_prototype<B>(mut self, prototype: Response<B>) -> Self {
        let (mut parts, _) = prototype.into_parts();
        parts.headers.remove(CONTENT_LENGTH);
        self.prototype_headers = parts.headers;
        self.prototype_version = parts.version;
        self
    }

    pub fn with_body_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Option<Vec<u8>> + Send + Sync + 'static,
    {
        self.body_factory = Arc::new(factory);
        self
    }

    /// Disclose opaque failure messages and codes outside debug mode.
    pub fn with_expose_failure_detail(mut self, expose: bool) -> Self {
        self.expose_failure_detail = expose;
        self
    }

    pub fn with_default_detail_message(mut self, message: impl Into<String>) -> Self {
        self.default_detail_message = message.into();
        self
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn json_flags(&self) -> JsonFlags {
        self.json_flags
    }

    pub fn exposes_failure_detail(&self) -> bool {
        self.expose_failure_detail
    }

    pub fn default_detail_message(&self) -> &str {
        &self.default_detail_message
    }

    /// Builds a problem response.
    ///
    /// `status` is normalized into 400..=599 (500 otherwise); missing or empty
    /// `title` / `type_url` are defaulted from the status.
    pub fn build(
        &self,
        headers: &HeaderMap,
        status: i64,
        detail: impl Into<String>,
        title: Option<&str>,
        type_url: Option<&str>,
        extensions: Map<String, Value>,
    ) -> Result<Response<Body>, ProblemError> {
        let details: ProblemDetails =
            ProblemDetails::resolve(status, detail, title, type_url, extensions);
        self.build_details(headers, &details)
    }

    /// Renders an already resolved payload.
    pub fn build_details(
        &self,
        headers: &HeaderMap,
        details: &ProblemDetails,
    ) -> Result<Response<Body>, ProblemError> {
        let format: ProblemFormat = negotiate_format(headers);

        let payload: Vec<u8> = match format {
            ProblemFormat::Json => to_json_vec(details, self.json_flags)?,
            ProblemFormat::Xml => to_xml_string(&details.to_value())?.into_bytes(),
        };

        debug!(
            status = details.status,
            content_type = format.content_type(),
            "Built problem details response"
        );

        self.generate_response(details.status, format, &payload)
    }

    /// Builds the response for a failure.
    ///
    /// Structured problems are rendered verbatim. For anything else the
    /// message and code are only used in debug mode or when failure detail is
    /// exposed; otherwise the default detail message and status 500 are used,
    /// whatever the failure's code. The `exception` record is debug-only.
    pub fn build_from_failure(
        &self,
        headers: &HeaderMap,
        failure: Failure,
    ) -> Result<Response<Body>, ProblemError> {
        let record: FailureRecord = match failure.into_record() {
            Ok(record) => record,
            Err(problem) => {
                return self.build(
                    headers,
                    problem.status,
                    problem.detail,
                    problem.title.as_deref(),
                    problem.type_url.as_deref(),
                    problem.extensions,
                );
            }
        };

        let disclose: bool = self.debug || self.expose_failure_detail;

        let detail: String = if disclose {
            record.message.clone()
        } else {
            self.default_detail_message.clone()
        };
        let status: i64 = if disclose { record.code } else { 500 };
        let extensions: Map<String, Value> = if self.debug {
            record.debug_extensions()
        } else {
            Map::new()
        };

        self.build(headers, status, detail, None, None, extensions)
    }

    fn generate_response(
        &self,
        status: u16,
        format: ProblemFormat,
        payload: &[u8],
    ) -> Result<Response<Body>, ProblemError> {
        let mut body: Vec<u8> = (self.body_factory)().ok_or(ProblemError::InvalidResponseBody)?;
        body.write_all(payload)?;

        let mut response: Response<Body> = Response::new(Body::from(body));
        *response.status_mut() =
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        *response.version_mut() = self.prototype_version;

        let response_headers: &mut HeaderMap = response.headers_mut();
        response_headers.extend(self.prototype_headers.clone());
        response_headers.insert(CONTENT_TYPE, HeaderValue::from_static(format.content_type()));

        Ok(response)
    }
}


// End of file: /src/problem/builder.rs
