// Start of file: /src/problem/details.rs

// * RFC 7807 payload and the structured problem callers raise to control it.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use super::status::{default_title, default_type, normalize_status};

/// Member names that extensions can never shadow.
pub const CORE_MEMBERS: [&str; 4] = ["title", "type", "status", "detail"];

/// Fully resolved problem payload: status normalized, title and type defaulted.
///
/// Serializes as a single flat object: the four core members first, then every
/// extension whose name does not collide with a core member, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemDetails {
    pub status: u16,
    pub title: String,
    pub type_url: String,
    pub detail: String,
    pub extensions: Map<String, Value>,
}

impl ProblemDetails {
    /// Resolves a payload from raw inputs.
    ///
    /// Empty `title` / `type_url` count as absent.
    pub fn resolve(
        status: i64,
        detail: impl Into<String>,
        title: Option<&str>,
        type_url: Option<&str>,
        extensions: Map<String, Value>,
    ) -> Self {
        let status: u16 = normalize_status(status);

        Self {
            status,
            title: title
                .filter(|t| !t.is_empty())
                .map(str::to_owned)
                .unwrap_or_else(|| default_title(status).to_owned()),
            type_url: type_url
                .filter(|t| !t.is_empty())
                .map(str::to_owned)
                .unwrap_or_else(|| default_type(status)),
            detail: detail.into(),
            extensions,
        }
    }

    /// Plain nested-map form of the payload, as written on the wire.
    pub fn to_value(&self) -> Value {
        let mut object: Map<String, Value> = Map::with_capacity(4 + self.extensions.len());
        object.insert("title".into(), Value::from(self.title.as_str()));
        object.insert("type".into(), Value::from(self.type_url.as_str()));
        object.insert("status".into(), Value::from(self.status));
        object.insert("detail".into(), Value::from(self.detail.as_str()));

        for (key, value) in self.extensions_without_core() {
            object.insert(key.clone(), value.clone());
        }

        Value::Object(object)
    }

    fn extensions_without_core(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.extensions
            .iter()
            .filter(|(key, _)| !CORE_MEMBERS.contains(&key.as_str()))
    }
}

impl Serialize for ProblemDetails {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("title", &self.title)?;
        map.serialize_entry("type", &self.type_url)?;
        map.serialize_entry("status", &self.status)?;
        map.serialize_entry("detail", &self.detail)?;
        for (key, value) in self.extensions_without_core() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A failure that fully describes the problem it wants rendered.
///
/// Returned from handlers (usually wrapped in [`Failure`](super::Failure)), its
/// values are passed to the builder verbatim, in debug and production alike.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{detail}")]
#[must_use]
pub struct Problem {
    pub status: i64,
    pub detail: String,
    pub title: Option<String>,
    pub type_url: Option<String>,
    pub extensions: Map<String, Value>,
}

impl Problem {
    pub fn new(status: i64, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
            title: None,
            type_url: None,
            extensions: Map::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_type(mut self, type_url: impl Into<String>) -> Self {
        self.type_url = Some(type_url.into());
        self
    }

    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }

    pub fn with_extensions(mut self, extensions: Map<String, Value>) -> Self {
        self.extensions.extend(extensions);
        self
    }
}


// End of file: /src/problem/details.rs
