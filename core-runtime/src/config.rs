//! # Core Configuration Module
//!
//! Provides the transport-level configuration shared by every OAuth client
//! instance.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds the bridges and request defaults. It enforces fail-fast
//! validation so a missing HTTP client is reported at startup rather than on
//! the first token request.
//!
//! ## Dependencies
//!
//! - `HttpClient` - HTTP operations (desktop default: reqwest)
//! - `Clock` - Time source used to stamp tokens (default: system clock)
//!
//! When the `desktop-shims` feature is enabled, a `ReqwestHttpClient` is
//! injected automatically if no client is provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::time::Duration;
//!
//! let config = CoreConfig::builder()
//!     .request_timeout(Duration::from_secs(30))
//!     .user_agent("my-app/1.0")
//!     .build()
//!     .expect("Failed to build config");
//! ```

use crate::error::{Error, Result};
use bridge_traits::{Clock, HttpClient, SystemClock};
use std::sync::Arc;
use std::time::Duration;

/// Default user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("box-oauth/", env!("CARGO_PKG_VERSION"));

/// Upper bound accepted for `request_timeout`.
const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Transport configuration for OAuth clients.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// HTTP client used by the default connection
    pub http_client: Arc<dyn HttpClient>,

    /// Time source used to stamp obtained tokens
    pub clock: Arc<dyn Clock>,

    /// Per-request timeout; `None` leaves requests unbounded
    pub request_timeout: Option<Duration>,

    /// User agent header value
    pub user_agent: String,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("http_client", &"HttpClient { ... }")
            .field("clock", &"Clock { ... }")
            .field("request_timeout", &self.request_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - User agent is not empty
    /// - Request timeout, when set, is non-zero and at most 5 minutes
    pub fn validate(&self) -> Result<()> {
        if self.user_agent.trim().is_empty() {
            return Err(Error::Config("User agent cannot be empty".to_string()));
        }

        if let Some(timeout) = self.request_timeout {
            if timeout.is_zero() {
                return Err(Error::Config(
                    "Request timeout must be greater than 0".to_string(),
                ));
            }

            if timeout > MAX_REQUEST_TIMEOUT {
                return Err(Error::Config(format!(
                    "Request timeout exceeds maximum of {} seconds",
                    MAX_REQUEST_TIMEOUT.as_secs()
                )));
            }
        }

        Ok(())
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn http_client_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "No HTTP client implementation provided. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default ReqwestHttpClient. \
                 Other hosts: inject a platform-native adapter via CoreConfig::builder().http_client(..)."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(
    timeout: Option<Duration>,
    user_agent: &str,
) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::build(timeout, user_agent).map_err(|e| {
        Error::Internal(format!("Failed to initialize default HttpClient: {}", e))
    })?;

    let client: Arc<dyn HttpClient> = Arc::new(client);
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(
    _timeout: Option<Duration>,
    _user_agent: &str,
) -> Result<Arc<dyn HttpClient>> {
    Err(http_client_missing_error())
}

/// Builder for constructing [`CoreConfig`] instances.
///
/// Call [`build()`](CoreConfigBuilder::build) once every option is set. The
/// builder validates the result and injects platform defaults where allowed.
#[derive(Default)]
pub struct CoreConfigBuilder {
    http_client: Option<Arc<dyn HttpClient>>,
    clock: Option<Arc<dyn Clock>>,
    request_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl CoreConfigBuilder {
    /// Sets the HTTP client implementation.
    ///
    /// If not provided, the desktop default (reqwest-based) will be used when
    /// the `desktop-shims` feature is enabled.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the time source. Defaults to [`SystemClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets a per-request timeout.
    ///
    /// Default: none
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the user agent header value.
    ///
    /// Default: [`DEFAULT_USER_AGENT`]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] when no HTTP client was provided and
    ///   the `desktop-shims` feature is disabled
    /// - [`Error::Config`] when validation fails
    pub fn build(self) -> Result<CoreConfig> {
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(self.request_timeout, &user_agent)?,
        };

        let config = CoreConfig {
            http_client,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            request_timeout: self.request_timeout,
            user_agent,
        };

        config.validate()?;

        Ok(config)
    }
}
