// Start of file: /src/problem/failure.rs

// * Runtime description of what went wrong while handling a request.

use std::any::Any;
use std::error::Error;
use std::panic::Location;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{json, Map, Value};

use super::details::Problem;

/// Message used for [`Failure::MissingResponse`].
pub const MISSING_RESPONSE_MESSAGE: &str = "Application did not return a response";

/// Everything the builder can be asked to render.
///
/// Consumed once by [`build_from_failure`].
///
/// [`build_from_failure`]: super::ProblemResponseBuilder::build_from_failure
#[derive(Debug, Clone, thiserror::Error)]
pub enum Failure {
    /// Caller-controlled problem, rendered verbatim.
    #[error(transparent)]
    Problem(#[from] Problem),

    /// Panic, handler error or trapped runtime error. Details are only
    /// disclosed in debug mode or when explicitly exposed.
    #[error("{}", .0.message)]
    Opaque(FailureRecord),

    /// The downstream stage finished without producing a response.
    #[error("Application did not return a response")]
    MissingResponse,
}

impl Failure {
    /// Opaque failure from any error type, keeping its source chain.
    pub fn from_error<E: Error + 'static>(err: &E) -> Self {
        Self::Opaque(FailureRecord::from_error(err))
    }

    /// Opaque failure from a type-erased error, such as a tower `BoxError`.
    pub fn from_boxed(err: Box<dyn Error + Send + Sync>) -> Self {
        Self::Opaque(FailureRecord::from_dyn(&*err))
    }

    /// The record the builder works from for non-structured failures.
    pub(crate) fn into_record(self) -> Result<FailureRecord, Problem> {
        match self {
            Self::Problem(problem) => Err(problem),
            Self::Opaque(record) => Ok(record),
            Self::MissingResponse => Ok(FailureRecord::missing_response()),
        }
    }
}

impl From<FailureRecord> for Failure {
    fn from(record: FailureRecord) -> Self {
        Self::Opaque(record)
    }
}

impl From<anyhow::Error> for Failure {
    fn from(err: anyhow::Error) -> Self {
        let mut chain = err.chain();
        let head: FailureRecord = chain
            .next()
            .map(|top| FailureRecord::new("anyhow::Error", top.to_string()))
            .unwrap_or_else(|| FailureRecord::new("anyhow::Error", err.to_string()));

        Self::Opaque(head.with_causes(chain.map(|cause| FailureRecord::from_source(cause))))
    }
}

/// Handlers can return `Result<_, Failure>`. Without an interceptor around them
/// the client sees a bare 500; the interceptor picks the failure back up from the
/// response extensions and renders it.
impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let mut response: Response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// Diagnostic record of an opaque failure and its causes.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureRecord {
    pub class: String,
    pub code: i64,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub previous: Option<Box<FailureRecord>>,
}

impl FailureRecord {
    pub fn new(class: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            code: 0,
            message: message.into(),
            file: None,
            line: None,
            previous: None,
        }
    }

    /// Same as [`FailureRecord::new`], located at the caller.
    #[track_caller]
    pub fn here(class: impl Into<String>, message: impl Into<String>) -> Self {
        let location: &'static Location<'static> = Location::caller();
        Self::new(class, message).with_location(location.file(), location.line())
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.code = code;
        self
    }

    pub fn with_location(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    /// Appends `cause` at the end of the cause chain.
    pub fn caused_by(mut self, cause: FailureRecord) -> Self {
        self.previous = Some(Box::new(match self.previous.take() {
            Some(previous) => (*previous).caused_by(cause),
            None => cause,
        }));
        self
    }

    fn with_causes(self, causes: impl Iterator<Item = FailureRecord>) -> Self {
        causes.fold(self, FailureRecord::caused_by)
    }

    /// Record for an error value; every `source()` becomes a cause.
    pub fn from_error<E: Error + 'static>(err: &E) -> Self {
        Self::new(std::any::type_name::<E>(), err.to_string()).with_causes(source_records(err))
    }

    /// Like [`FailureRecord::from_error`] for a type-erased error. Common std
    /// errors keep their type name, others are named from their `Debug` output.
    pub fn from_dyn(err: &(dyn Error + 'static)) -> Self {
        Self::from_source(err).with_causes(source_records(err))
    }

    fn from_source(err: &(dyn Error + 'static)) -> Self {
        Self::new(class_of_dyn(err), err.to_string())
    }

    /// Record for a caught panic payload.
    pub fn from_panic(payload: &(dyn Any + Send), location: Option<(String, u32)>) -> Self {
        let message: String = if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_owned()
        } else {
            "Unknown panic message".to_owned()
        };

        let record: Self = Self::new("panic", message);
        match location {
            Some((file, line)) => record.with_location(file, line),
            None => record,
        }
    }

    pub fn missing_response() -> Self {
        Self::new("MissingResponse", MISSING_RESPONSE_MESSAGE)
    }

    /// Causes, most recent first.
    pub fn causes(&self) -> impl Iterator<Item = &FailureRecord> {
        std::iter::successors(self.previous.as_deref(), |record| record.previous.as_deref())
    }

    fn entry(&self) -> Map<String, Value> {
        let mut entry: Map<String, Value> = Map::new();
        entry.insert("class".into(), json!(self.class));
        entry.insert("code".into(), json!(self.code));
        entry.insert("message".into(), json!(self.message));
        entry.insert("file".into(), json!(self.file));
        entry.insert("line".into(), json!(self.line));
        entry
    }

    /// Debug-mode extension: `{"exception": {..., "stack": [causes]}}`.
    pub fn debug_extensions(&self) -> Map<String, Value> {
        let mut exception: Map<String, Value> = self.entry();

        let stack: Vec<Value> = self.causes().map(|c| Value::Object(c.entry())).collect();
        if !stack.is_empty() {
            exception.insert("stack".into(), Value::Array(stack));
        }

        let mut extensions: Map<String, Value> = Map::new();
        extensions.insert("exception".into(), Value::Object(exception));
        extensions
    }
}

fn source_records(err: &dyn Error) -> std::vec::IntoIter<FailureRecord> {
    let mut records: Vec<FailureRecord> = Vec::new();
    let mut source: Option<&(dyn Error + 'static)> = err.source();

    while let Some(s) = source {
        records.push(FailureRecord::from_source(s));
        source = s.source();
    }

    records.into_iter()
}

fn is<E: Error + 'static>(err: &(dyn Error + 'static)) -> bool {
    err.is::<E>()
}

type ClassCheck = fn(&(dyn Error + 'static)) -> bool;

// Errors commonly found at the bottom of a source chain
const KNOWN_CLASSES: [(ClassCheck, &str); 9] = [
    (is::<std::io::Error>, "std::io::Error"),
    (is::<std::fmt::Error>, "std::fmt::Error"),
    (is::<std::num::ParseIntError>, "std::num::ParseIntError"),
    (is::<std::num::ParseFloatError>, "std::num::ParseFloatError"),
    (is::<std::str::ParseBoolError>, "std::str::ParseBoolError"),
    (is::<std::str::Utf8Error>, "std::str::Utf8Error"),
    (is::<std::string::FromUtf8Error>, "std::string::FromUtf8Error"),
    (is::<serde_json::Error>, "serde_json::Error"),
    (is::<tokio::time::error::Elapsed>, "tokio::time::error::Elapsed"),
];

// Type name for a type-erased error. Unknown types fall back to the leading
// identifier of their Debug output (`Inner { .. }`, `Timeout(..)`).
fn class_of_dyn(err: &(dyn Error + 'static)) -> String {
    if let Some((_, class)) = KNOWN_CLASSES.iter().find(|(check, _)| check(err)) {
        return (*class).to_owned();
    }

    let debug: String = format!("{err:?}");
    let name: String = debug
        .chars()
        .take_while(|c| c.is_alphanumeric() || matches!(c, '_' | ':'))
        .collect();

    if name.is_empty() {
        "dyn std::error::Error".to_owned()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("first")]
    struct Inner;

    #[derive(Debug, thiserror::Error)]
    #[error("second")]
    struct Outer(#[source] Inner);

    #[test]
    fn from_error_flattens_source_chain() {
        let record = FailureRecord::from_error(&Outer(Inner));

        assert!(record.class.ends_with("Outer"));
        assert_eq!(record.message, "second");

        let causes: Vec<&FailureRecord> = record.causes().collect();
        assert_eq!(causes.len(), 1);
        assert_eq!(causes[0].class, "Inner");
        assert_eq!(causes[0].message, "first");
    }

    #[test]
    fn boxed_errors_keep_their_chain() {
        let boxed: Box<dyn Error + Send + Sync> = Box::new(Outer(Inner));

        let Failure::Opaque(record) = Failure::from_boxed(boxed) else {
            panic!("expected an opaque failure");
        };
        assert_eq!(record.class, "Outer");
        assert_eq!(record.causes().next().map(|c| c.message.as_str()), Some("first"));
    }

    #[derive(Debug, thiserror::Error)]
    #[error("could not read the report")]
    struct ReadFailed(#[source] std::io::Error);

    #[test]
    fn std_errors_keep_their_type_name() {
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "report.csv is missing");
        let record = FailureRecord::from_error(&ReadFailed(missing));

        let cause = record.causes().next().unwrap();
        assert_eq!(cause.class, "std::io::Error");
        assert_eq!(cause.message, "report.csv is missing");

        let boxed: Box<dyn Error + Send + Sync> = "x1".parse::<u8>().unwrap_err().into();
        let Failure::Opaque(record) = Failure::from_boxed(boxed) else {
            panic!("expected an opaque failure");
        };
        assert_eq!(record.class, "std::num::ParseIntError");
    }

    #[test]
    fn caused_by_appends_to_the_end_of_the_chain() {
        let record = FailureRecord::new("A", "a")
            .caused_by(FailureRecord::new("B", "b"))
            .caused_by(FailureRecord::new("C", "c"));

        let messages: Vec<&str> = record.causes().map(|c| c.message.as_str()).collect();
        assert_eq!(messages, ["b", "c"]);
    }

    #[test]
    fn debug_extensions_list_causes_most_recent_first() {
        let first = FailureRecord::new("RuntimeError", "first").with_code(101_010);
        let second = FailureRecord::here("RuntimeError", "second")
            .with_code(101_011)
            .caused_by(first);

        let extensions = Value::Object(second.debug_extensions());

        assert_eq!(extensions["exception"]["message"], "second");
        assert_eq!(extensions["exception"]["code"], 101_011);
        assert_eq!(extensions["exception"]["file"], file!());
        assert_eq!(extensions["exception"]["stack"][0]["message"], "first");
        assert_eq!(extensions["exception"]["stack"][0]["code"], 101_010);
        assert_eq!(extensions["exception"]["stack"][0]["line"], Value::Null);
    }

    #[test]
    fn debug_extensions_omit_empty_stack() {
        let extensions = Value::Object(FailureRecord::new("X", "x").debug_extensions());
        assert!(extensions["exception"].get("stack").is_none());
    }

    #[test]
    fn panic_payloads_become_messages() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        let record = FailureRecord::from_panic(payload.as_ref(), Some(("src/x.rs".into(), 7)));

        assert_eq!(record.class, "panic");
        assert_eq!(record.message, "boom");
        assert_eq!(record.line, Some(7));

        let payload: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(
            FailureRecord::from_panic(payload.as_ref(), None).message,
            "Unknown panic message"
        );
    }

    #[test]
    fn anyhow_context_becomes_cause_chain() {
        let err = anyhow::anyhow!("disk on fire").context("could not save");

        let Failure::Opaque(record) = Failure::from(err) else {
            panic!("expected an opaque failure");
        };

        assert_eq!(record.message, "could not save");
        assert_eq!(record.causes().count(), 1);
        assert_eq!(record.causes().next().unwrap().message, "disk on fire");
    }

    #[test]
    fn missing_response_becomes_fixed_record() {
        let record = Failure::MissingResponse.into_record().unwrap();
        assert_eq!(record.message, MISSING_RESPONSE_MESSAGE);
        assert_eq!(record.code, 0);
    }

    #[test]
    fn failure_response_carries_the_failure() {
        let response = Failure::from(Problem::new(418, "short and stout")).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(matches!(
            response.extensions().get::<Failure>(),
            Some(Failure::Problem(p)) if p.status == 418
        ));
    }
}

// End of file: /src/problem/failure.rs
