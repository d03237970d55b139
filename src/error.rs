//! Error taxonomy for Skellar API calls.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;

/// Result alias used across the SDK.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure class of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or rejected API token (HTTP 401, or no token at construction).
    Authentication,
    /// The requested resource does not exist (HTTP 404).
    NotFound,
    /// The server rejected the request payload (HTTP 400).
    Validation,
    /// Rate limit exceeded (HTTP 429).
    RateLimit,
    /// Any other non-2xx API response.
    Api,
    /// Network-level failure: timeout, unreachable host, or retry exhaustion.
    Connection,
    /// Unclassified failure.
    Other,
}

/// Error returned by every fallible SDK operation.
///
/// A single kind-tagged type instead of one type per failure class. The
/// payload keeps whatever the server sent, so callers can branch on
/// [`kind`](Error::kind) and still inspect the status and raw body.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    status_code: Option<StatusCode>,
    body: Option<Value>,
    retry_after: Option<Duration>,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
            body: None,
            retry_after: None,
        }
    }

    pub(crate) fn with_response(mut self, status: StatusCode, body: Value) -> Self {
        self.status_code = Some(status);
        self.body = Some(body);
        self
    }

    pub(crate) fn with_retry_after(mut self, delay: Duration) -> Self {
        self.retry_after = Some(delay);
        self
    }

    /// Failure class.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP status of the response that produced this error, if any.
    pub fn status_code(&self) -> Option<StatusCode> {
        self.status_code
    }

    /// Parsed body of the response that produced this error, if any.
    pub fn response_body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Server-provided backoff hint, set on [`ErrorKind::RateLimit`] errors.
    pub fn retry_after(&self) -> Option<Duration> {
        self.retry_after
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_is_message() {
        let err = Error::new(ErrorKind::NotFound, "Resource not found.");
        assert_eq!(err.to_string(), "Resource not found.");
    }

    #[test]
    fn test_bare_error_has_no_response_payload() {
        let err = Error::new(ErrorKind::Connection, "Max retries exceeded");
        assert_eq!(err.kind(), ErrorKind::Connection);
        assert_eq!(err.status_code(), None);
        assert_eq!(err.response_body(), None);
        assert_eq!(err.retry_after(), None);
    }

    #[test]
    fn test_with_response_keeps_status_and_body() {
        let err = Error::new(ErrorKind::Validation, "Validation error: Bad request")
            .with_response(StatusCode::BAD_REQUEST, json!({"detail": "Bad request"}));
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.status_code(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(err.response_body(), Some(&json!({"detail": "Bad request"})));
    }

    #[test]
    fn test_retry_after_hint() {
        let err = Error::new(ErrorKind::RateLimit, "Rate limit exceeded. Retry after 5 seconds.")
            .with_response(StatusCode::TOO_MANY_REQUESTS, json!({}))
            .with_retry_after(Duration::from_secs(5));
        assert_eq!(err.retry_after(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_error_is_std_error() {
        fn assert_error<E: std::error::Error + Send + Sync + 'static>(_: &E) {}
        assert_error(&Error::new(ErrorKind::Other, "Request failed: boom"));
    }
}
