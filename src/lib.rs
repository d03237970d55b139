//! Rust client SDK for the Skellar API.
//!
//! Token-authenticated JSON client with a typed error taxonomy and bounded
//! exponential-backoff retries on connection failure.
//!
//! ```no_run
//! # async fn run() -> skellar_sdk::Result<()> {
//! let client = skellar_sdk::SkellarClient::builder()
//!     .api_token("sk-live-token")
//!     .build()?;
//!
//! let profile = client.get_user_profile().await?;
//! println!("signed in as {}", profile["username"]);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod runtime;

pub use client::{ClientBuilder, SkellarClient};
pub use config::ClientConfig;
pub use error::{Error, ErrorKind, Result};
pub use http::{RequestDescriptor, RequestExecutor, ResponseEnvelope};
pub use runtime::{RealRuntime, Runtime};

/// Crate version, also reported in the `User-Agent` header.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
