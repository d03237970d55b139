//! Caller-side description of one outbound API call.

use reqwest::Method;
use reqwest::header::{HeaderName, HeaderValue};
use serde_json::Value;

use crate::error::{Error, ErrorKind, Result};

/// Immutable description of a single request: method, path, and optional
/// JSON body, query parameters, and header overrides.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) body: Option<Value>,
    pub(crate) query: Vec<(String, Value)>,
    pub(crate) headers: Vec<(String, String)>,
}

impl RequestDescriptor {
    /// Create a descriptor for `method` on `path`. The path is joined to the
    /// client's base URL as-is.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// GET shorthand.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// POST shorthand.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Attach a JSON body. Not sent for GET requests.
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Append a query parameter. Null values are dropped when the URL is
    /// built; all other values are stringified.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set a header for this request, overriding the standard header of the
    /// same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Query pairs that survive null filtering, stringified for encoding.
    pub(crate) fn query_pairs(&self) -> Vec<(String, String)> {
        self.query
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| {
                let rendered = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), rendered)
            })
            .collect()
    }

    /// Validated header overrides for this request.
    pub(crate) fn header_overrides(&self) -> Result<Vec<(HeaderName, HeaderValue)>> {
        self.headers
            .iter()
            .map(|(name, value)| {
                let parsed_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                    Error::new(ErrorKind::Other, format!("Invalid header name {name:?}: {e}"))
                })?;
                let parsed_value = HeaderValue::from_str(value).map_err(|e| {
                    Error::new(
                        ErrorKind::Other,
                        format!("Invalid value for header {parsed_name}: {e}"),
                    )
                })?;
                Ok((parsed_name, parsed_value))
            })
            .collect()
    }
}
