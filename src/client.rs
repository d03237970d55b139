//! Skellar API client facade.

use std::time::Duration;

use log::debug;
use reqwest::Client;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::http::{RequestDescriptor, RequestExecutor, ResponseEnvelope};
use crate::runtime::{RealRuntime, Runtime};

/// Client for the Skellar API.
///
/// Constructed through [`SkellarClient::builder`]. The API token comes from
/// the builder or the `SKELLAR_API_TOKEN` environment variable; construction
/// fails when neither is set.
#[derive(Debug)]
pub struct SkellarClient<R: Runtime = RealRuntime> {
    executor: RequestExecutor<R>,
}

impl SkellarClient<RealRuntime> {
    /// Build a client entirely from the environment.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Start configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }
}

impl<R: Runtime> SkellarClient<R> {
    /// Fetch the profile of the user the token belongs to.
    #[tracing::instrument(skip(self))]
    pub async fn get_user_profile(&self) -> Result<Value> {
        let envelope = self
            .executor
            .execute(&RequestDescriptor::get("/api/v1/users/profile/"))
            .await?;
        Ok(envelope.data)
    }

    /// Mark a node within a starbook chapter as complete for the current
    /// user.
    #[tracing::instrument(skip(self))]
    pub async fn complete_star_node(
        &self,
        starbook_slug: &str,
        chapter_slug: &str,
        node_slug: &str,
    ) -> Result<Value> {
        let path = format!(
            "/api/v1/public/starbooks/{starbook_slug}/chapters/{chapter_slug}/nodes/{node_slug}/user-check-complete/"
        );
        let envelope = self.executor.execute(&RequestDescriptor::post(path)).await?;
        Ok(envelope.data)
    }

    /// Fetch a user's progress rows within a chapter. Returns the `results`
    /// field of the response body, or JSON null when the field is absent.
    #[tracing::instrument(skip(self))]
    pub async fn get_user_progress(&self, chapter_slug: &str, user_id: &str) -> Result<Value> {
        let descriptor = RequestDescriptor::get(format!(
            "/api/v1/starscriber/chapters/{chapter_slug}/progress/"
        ))
        .query("user_id", user_id);
        let envelope = self.executor.execute(&descriptor).await?;
        Ok(envelope.data.get("results").cloned().unwrap_or_default())
    }

    /// Execute an arbitrary request against the API, for endpoints the
    /// typed methods do not cover.
    pub async fn request(&self, descriptor: &RequestDescriptor) -> Result<ResponseEnvelope> {
        self.executor.execute(descriptor).await
    }
}

/// Builder for [`SkellarClient`].
#[derive(Debug, Default)]
pub struct ClientBuilder {
    api_token: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    max_retries: Option<u32>,
}

impl ClientBuilder {
    /// API token. Falls back to `SKELLAR_API_TOKEN` when unset.
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Base URL. Falls back to `SKELLAR_BASE_URL`, then the production API.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Per-attempt timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Retry budget for connection failures. Defaults to 3.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Build against the production runtime.
    pub fn build(self) -> Result<SkellarClient<RealRuntime>> {
        self.build_with_runtime(RealRuntime)
    }

    /// Build with an injected [`Runtime`].
    pub fn build_with_runtime<R: Runtime>(self, runtime: R) -> Result<SkellarClient<R>> {
        let config = ClientConfig::resolve(
            &runtime,
            self.api_token,
            self.base_url,
            self.timeout,
            self.max_retries,
        )?;
        debug!("Skellar client ready for {}", config.base_url);

        let client = Client::builder().build().map_err(|e| {
            Error::new(ErrorKind::Other, format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(SkellarClient {
            executor: RequestExecutor::new(client, config, runtime),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TOKEN_ENV_VAR;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use std::env::VarError;

    #[test]
    fn test_build_without_token_fails_before_any_network_call() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq(TOKEN_ENV_VAR))
            .returning(|_| Err(VarError::NotPresent));

        let err = SkellarClient::builder()
            .build_with_runtime(runtime)
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Authentication);
    }

    #[test]
    fn test_build_with_explicit_values_reads_no_env() {
        // The mock has no env_var expectations, so any env read panics.
        let runtime = MockRuntime::new();

        let client = SkellarClient::builder()
            .api_token("token")
            .base_url("http://127.0.0.1:9")
            .build_with_runtime(runtime);

        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_get_user_progress_unwraps_results() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/v1/starscriber/chapters/intro/progress/")
            .match_query(mockito::Matcher::UrlEncoded(
                "user_id".to_string(),
                "user-1".to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"results": [{"node": "a", "complete": true}]}"#)
            .create_async()
            .await;

        let client = SkellarClient::builder()
            .api_token("token")
            .base_url(server.url())
            .build()
            .unwrap();

        let progress = client.get_user_progress("intro", "user-1").await.unwrap();
        assert_eq!(
            progress,
            serde_json::json!([{"node": "a", "complete": true}])
        );
    }

    #[tokio::test]
    async fn test_get_user_progress_missing_results_is_null() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/v1/starscriber/chapters/intro/progress/")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = SkellarClient::builder()
            .api_token("token")
            .base_url(server.url())
            .build()
            .unwrap();

        let progress = client.get_user_progress("intro", "user-1").await.unwrap();
        assert!(progress.is_null());
    }
}
