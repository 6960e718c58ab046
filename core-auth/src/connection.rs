//! Minimal HTTP transport used by the OAuth client.
//!
//! A [`Connection`] issues GET requests and form-encoded POST requests
//! against fixed URIs and hands back the raw response. It never interprets
//! status codes: a 302 from the authorize endpoint or a 400 carrying an
//! OAuth error body are both returned as `Ok`.
//!
//! [`HttpConnection`] is the default implementation on top of any
//! [`HttpClient`] bridge.

use crate::error::{AuthError, Result};
use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bytes::Bytes;
use core_runtime::config::CoreConfig;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Raw response payload returned by a [`Connection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as UTF-8 text.
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| AuthError::MalformedResponse(format!("Invalid UTF-8: {}", e)))
    }

    /// Body decoded as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            AuthError::MalformedResponse(format!(
                "Expected JSON body (HTTP {}): {}",
                self.status, e
            ))
        })
    }
}

impl From<HttpResponse> for RawResponse {
    fn from(response: HttpResponse) -> Self {
        Self {
            status: response.status,
            body: response.body,
        }
    }
}

/// HTTP transport abstraction used by [`OAuthClient`](crate::OAuthClient).
#[async_trait]
pub trait Connection: Send + Sync {
    /// Issue a GET request. Non-2xx statuses are not errors.
    async fn get(&self, uri: &str) -> Result<RawResponse>;

    /// Issue a POST request with `params` form-encoded as the body.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidInput`] without sending anything when
    /// `params` is not a flat key-value mapping.
    async fn post(&self, uri: &str, params: &Value) -> Result<RawResponse>;
}

/// Encode a flat JSON object as an `application/x-www-form-urlencoded` body.
///
/// Strings are sent verbatim, numbers and booleans in their JSON spelling,
/// and `null` values are skipped. Nested objects, arrays and non-object
/// top-level values are rejected.
pub fn encode_form(params: &Value) -> Result<String> {
    let Value::Object(map) = params else {
        return Err(AuthError::InvalidInput(
            "params must be a key-value mapping".to_string(),
        ));
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        let value = match value {
            Value::Null => continue,
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Array(_) | Value::Object(_) => {
                return Err(AuthError::InvalidInput(format!(
                    "param '{}' must be a scalar value",
                    key
                )));
            }
        };
        pairs.push((key.as_str(), value));
    }

    serde_urlencoded::to_string(&pairs)
        .map_err(|e| AuthError::InvalidInput(format!("Failed to encode params: {}", e)))
}

/// Per-request settings applied by [`HttpConnection`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Per-request timeout
    pub timeout: Option<Duration>,
    /// `User-Agent` header value
    pub user_agent: Option<String>,
}

/// [`Connection`] backed by an [`HttpClient`] bridge.
#[derive(Clone)]
pub struct HttpConnection {
    http_client: Arc<dyn HttpClient>,
    config: ConnectionConfig,
}

impl HttpConnection {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            config: ConnectionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ConnectionConfig) -> Self {
        self.config = config;
        self
    }

    /// Build a connection from the shared runtime configuration.
    pub fn from_core_config(core: &CoreConfig) -> Self {
        Self::new(Arc::clone(&core.http_client)).with_config(ConnectionConfig {
            timeout: core.request_timeout,
            user_agent: Some(core.user_agent.clone()),
        })
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    fn prepare(&self, mut request: HttpRequest) -> HttpRequest {
        if let Some(timeout) = self.config.timeout {
            request = request.timeout(timeout);
        }
        if let Some(user_agent) = &self.config.user_agent {
            request = request.header("User-Agent", user_agent.clone());
        }
        request
    }

    async fn send(&self, request: HttpRequest) -> Result<RawResponse> {
        let method = request.method;
        let response = self.http_client.execute(self.prepare(request)).await?;

        debug!(
            method = method.as_str(),
            status = response.status,
            "Connection received response"
        );

        Ok(response.into())
    }
}

impl std::fmt::Debug for HttpConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConnection")
            .field("http_client", &"HttpClient { ... }")
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl Connection for HttpConnection {
    async fn get(&self, uri: &str) -> Result<RawResponse> {
        self.send(HttpRequest::new(HttpMethod::Get, uri)).await
    }

    async fn post(&self, uri: &str, params: &Value) -> Result<RawResponse> {
        let body = encode_form(params)?;

        let request = HttpRequest::new(HttpMethod::Post, uri)
            .header("Content-Type", FORM_CONTENT_TYPE)
            .header("Accept", "application/json")
            .body(Bytes::from(body));

        self.send(request).await
    }
}
