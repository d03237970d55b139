//! Runtime abstraction for ambient effects.
//!
//! Besides the HTTP transport, the SDK touches the outside world in two
//! places: environment variables at construction time and backoff sleeps
//! between retry attempts. Both go through this trait so tests can run
//! without real environment variables or real timers.

use std::env as std_env;
use std::time::Duration;

use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Runtime: Send + Sync {
    /// Read an environment variable.
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;

    /// Suspend the current task for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Production [`Runtime`] backed by `std::env` and the tokio timer.
pub struct RealRuntime;

#[async_trait]
impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        std_env::var(key)
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_runtime_env_var() {
        let runtime = RealRuntime;

        // PATH should exist on all systems
        assert!(runtime.env_var("PATH").is_ok());
        assert!(runtime.env_var("SKELLAR_SDK_TEST_UNSET_VAR").is_err());
    }

    #[tokio::test]
    async fn test_real_runtime_sleep_completes() {
        RealRuntime.sleep(Duration::from_millis(1)).await;
    }
}
