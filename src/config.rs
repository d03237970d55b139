//! Client configuration and environment resolution.

use std::time::Duration;

use log::debug;

use crate::error::{Error, ErrorKind, Result};
use crate::runtime::Runtime;

/// Environment variable consulted when no token is supplied explicitly.
pub const TOKEN_ENV_VAR: &str = "SKELLAR_API_TOKEN";

/// Environment variable consulted when no base URL is supplied explicitly.
pub const BASE_URL_ENV_VAR: &str = "SKELLAR_BASE_URL";

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.skellar.ai";

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default retry budget for connection failures.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Immutable configuration shared by every call made through one client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_token: String,
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl ClientConfig {
    /// Resolve explicit values against the environment, explicit values
    /// winning. Fails with an authentication error when no token can be
    /// found, before any network call is made.
    pub fn resolve<R: Runtime>(
        runtime: &R,
        api_token: Option<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
        max_retries: Option<u32>,
    ) -> Result<Self> {
        let api_token = non_empty(api_token)
            .or_else(|| non_empty(runtime.env_var(TOKEN_ENV_VAR).ok()))
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::Authentication,
                    format!(
                        "API token is required. Provide it in the builder or set {TOKEN_ENV_VAR}."
                    ),
                )
            })?;

        let base_url = non_empty(base_url)
            .or_else(|| non_empty(runtime.env_var(BASE_URL_ENV_VAR).ok()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        debug!("Resolved client config with base URL {}", base_url);

        Ok(Self {
            api_token,
            base_url,
            timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
            max_retries: max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
        })
    }
}

/// Empty strings count as absent, for both explicit values and env vars.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
