//! Successful call result.

use std::collections::HashMap;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, ErrorKind, Result};

/// The outcome of one successful API call: parsed body, status line, and
/// response headers flattened into a lowercase-name map.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    pub data: Value,
    pub status: StatusCode,
    pub status_text: String,
    pub headers: HashMap<String, String>,
}

impl ResponseEnvelope {
    /// Deserialize the response body into a typed value.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.data.clone()).map_err(|e| {
            Error::new(ErrorKind::Other, format!("Failed to parse response body: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Profile {
        id: u64,
        username: String,
    }

    #[test]
    fn test_parse_typed_body() {
        let envelope = ResponseEnvelope {
            data: json!({"id": 7, "username": "astra"}),
            status: StatusCode::OK,
            status_text: "OK".to_string(),
            headers: HashMap::new(),
        };

        let profile: Profile = envelope.parse().unwrap();
        assert_eq!(
            profile,
            Profile {
                id: 7,
                username: "astra".to_string()
            }
        );
    }

    #[test]
    fn test_parse_mismatch_is_an_error() {
        let envelope = ResponseEnvelope {
            data: json!({}),
            status: StatusCode::OK,
            status_text: "OK".to_string(),
            headers: HashMap::new(),
        };

        let err = envelope.parse::<Profile>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }
}
