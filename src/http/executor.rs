//! Request execution with bounded exponential-backoff retries.

use std::time::Duration;

use log::{debug, warn};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Method, Response};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::http::classify::{TransportFailure, classify_response, classify_send_error};
use crate::http::request::RequestDescriptor;
use crate::http::response::ResponseEnvelope;
use crate::runtime::Runtime;

/// User-Agent reported on every request.
pub(crate) const SDK_USER_AGENT: &str = concat!("skellar-rust-sdk/", env!("CARGO_PKG_VERSION"));

/// Executes [`RequestDescriptor`]s against the configured API.
///
/// Every call produces exactly one [`ResponseEnvelope`] or one [`Error`].
/// Only pure connection failures are retried; HTTP error responses and
/// timeouts are terminal on first occurrence.
#[derive(Debug)]
pub struct RequestExecutor<R: Runtime> {
    client: Client,
    config: ClientConfig,
    runtime: R,
}

impl<R: Runtime> RequestExecutor<R> {
    /// Create an executor from a reqwest client and resolved configuration.
    pub fn new(client: Client, config: ClientConfig, runtime: R) -> Self {
        Self {
            client,
            config,
            runtime,
        }
    }

    /// Perform the described call, retrying connection failures with
    /// exponential backoff up to the configured budget.
    #[tracing::instrument(skip(self, descriptor), fields(method = %descriptor.method, path = %descriptor.path))]
    pub async fn execute(&self, descriptor: &RequestDescriptor) -> Result<ResponseEnvelope> {
        let mut headers = self.standard_headers()?;
        for (name, value) in descriptor.header_overrides()? {
            headers.insert(name, value);
        }

        let mut attempt: u32 = 0;

        while attempt <= self.config.max_retries {
            debug!(
                "{} {}{}...",
                descriptor.method, self.config.base_url, descriptor.path
            );

            match self.send_once(descriptor, &headers).await {
                Ok(response) => return classify_response(response).await,
                Err(error) => match classify_send_error(error) {
                    TransportFailure::TimedOut => {
                        return Err(Error::new(
                            ErrorKind::Connection,
                            format!(
                                "Request timed out after {}ms",
                                self.config.timeout.as_millis()
                            ),
                        ));
                    }
                    TransportFailure::Unreachable(error) => {
                        if attempt >= self.config.max_retries {
                            return Err(Error::new(
                                ErrorKind::Connection,
                                "Failed to connect to the Skellar API",
                            ));
                        }
                        attempt += 1;
                        let delay = Duration::from_secs(2u64.saturating_pow(attempt));
                        warn!(
                            "Connection attempt {}/{} failed ({}), retrying in {}s...",
                            attempt,
                            self.config.max_retries,
                            error,
                            delay.as_secs()
                        );
                        self.runtime.sleep(delay).await;
                    }
                    TransportFailure::Fatal(error) => {
                        return Err(Error::new(
                            ErrorKind::Other,
                            format!("Request failed: {error}"),
                        ));
                    }
                },
            }
        }

        Err(Error::new(ErrorKind::Connection, "Max retries exceeded"))
    }

    /// One attempt on the wire, without classification or retries.
    async fn send_once(
        &self,
        descriptor: &RequestDescriptor,
        headers: &HeaderMap,
    ) -> std::result::Result<Response, reqwest::Error> {
        let url = format!("{}{}", self.config.base_url, descriptor.path);

        let mut request = self
            .client
            .request(descriptor.method.clone(), &url)
            .timeout(self.config.timeout)
            .headers(headers.clone());

        let query = descriptor.query_pairs();
        if !query.is_empty() {
            request = request.query(&query);
        }

        if let Some(body) = &descriptor.body {
            if descriptor.method != Method::GET {
                request = request.json(body);
            }
        }

        request.send().await
    }

    /// Standard headers attached to every request. The token goes out raw,
    /// without a `Bearer` prefix.
    fn standard_headers(&self) -> Result<HeaderMap> {
        let mut auth = HeaderValue::from_str(&self.config.api_token).map_err(|_| {
            Error::new(
                ErrorKind::Authentication,
                "API token contains characters not allowed in a header",
            )
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(SDK_USER_AGENT));
        Ok(headers)
    }
}
