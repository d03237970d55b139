//! Classification of wire outcomes: HTTP statuses into the error taxonomy,
//! transport failures into retry decisions.

use std::collections::HashMap;
use std::time::Duration;

use log::debug;
use reqwest::header::RETRY_AFTER;
use reqwest::{Response, StatusCode};
use serde_json::{Map, Value};

use crate::error::{Error, ErrorKind, Result};
use crate::http::response::ResponseEnvelope;

/// Backoff hint applied when a 429 carries no usable `Retry-After` header.
pub(crate) const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

/// How a failed send attempt should be handled.
#[derive(Debug)]
pub(crate) enum TransportFailure {
    /// The attempt hit the configured deadline. Surfaced immediately.
    TimedOut,
    /// The host could not be reached (refused, reset, DNS). Retryable.
    Unreachable(reqwest::Error),
    /// Any other transport-level failure. Surfaced immediately.
    Fatal(reqwest::Error),
}

/// Classify an error raised before any HTTP response arrived.
pub(crate) fn classify_send_error(error: reqwest::Error) -> TransportFailure {
    if error.is_timeout() {
        TransportFailure::TimedOut
    } else if error.is_connect() {
        TransportFailure::Unreachable(error)
    } else {
        TransportFailure::Fatal(error)
    }
}

/// Map a received response onto the status table: an envelope for 2xx, a
/// classified error for everything else. HTTP-level errors are never
/// retried.
pub(crate) async fn classify_response(response: Response) -> Result<ResponseEnvelope> {
    let status = response.status();
    let status_text = status.canonical_reason().unwrap_or_default().to_string();
    let retry_after = parse_retry_after(&response);
    let headers = flatten_headers(&response);
    let data = read_json_body(response).await;

    match status {
        StatusCode::TOO_MANY_REQUESTS => Err(Error::new(
            ErrorKind::RateLimit,
            format!(
                "Rate limit exceeded. Retry after {} seconds.",
                retry_after.as_secs()
            ),
        )
        .with_response(status, data)
        .with_retry_after(retry_after)),
        StatusCode::UNAUTHORIZED => Err(Error::new(
            ErrorKind::Authentication,
            "Authentication failed. Check your API token.",
        )
        .with_response(status, data)),
        StatusCode::NOT_FOUND => {
            Err(Error::new(ErrorKind::NotFound, "Resource not found.").with_response(status, data))
        }
        StatusCode::BAD_REQUEST => {
            let detail = data
                .get("detail")
                .and_then(Value::as_str)
                .unwrap_or("Bad request")
                .to_string();
            Err(
                Error::new(ErrorKind::Validation, format!("Validation error: {detail}"))
                    .with_response(status, data),
            )
        }
        s if s.is_success() => {
            debug!("{} {}", status.as_u16(), status_text);
            Ok(ResponseEnvelope {
                data,
                status,
                status_text,
                headers,
            })
        }
        _ => Err(Error::new(
            ErrorKind::Api,
            format!("API request failed: {} {}", status.as_u16(), status_text),
        )
        .with_response(status, data)),
    }
}

fn parse_retry_after(response: &Response) -> Duration {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

fn flatten_headers(response: &Response) -> HashMap<String, String> {
    response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect()
}

/// Best-effort body parse. Empty or unparseable bodies become an empty
/// object rather than an error.
async fn read_json_body(response: Response) -> Value {
    let text = response.text().await.unwrap_or_default();
    if text.is_empty() {
        return Value::Object(Map::new());
    }
    serde_json::from_str(&text).unwrap_or_else(|_| Value::Object(Map::new()))
}
