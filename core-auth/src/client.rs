//! OAuth 2.0 client for the Box API
//!
//! Implements the authorization code grant (RFC 6749 §4.1), refresh
//! (§6) and token revocation (RFC 7009) against the Box OAuth endpoints.
//!
//! # Overview
//!
//! The client handles:
//! - Building the interactive authorization URL
//! - Exchanging authorization codes for tokens
//! - Refreshing access tokens in place
//! - Revoking tokens
//!
//! Every operation awaits exactly one request through the configured
//! [`Connection`]. Nothing is retried.
//!
//! # Security
//!
//! - Tokens, client secrets and authorization codes are never logged
//! - The default transport keeps TLS certificate verification on
//!
//! # Example
//!
//! ```no_run
//! use core_auth::{OAuthClient, OAuthConfig};
//! use core_runtime::config::CoreConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let core = CoreConfig::builder().build()?;
//! let config = OAuthConfig::new("client-id", "client-secret")
//!     .with_redirect_uri("https://app.example.com/callback")
//!     .with_state("security_token=KnhMJatFipTAnM0nHlZA");
//!
//! let mut client = OAuthClient::from_core_config(config, &core)?;
//! let url = client.build_authorization_redirect_uri()?;
//! println!("Visit: {}", url);
//!
//! // After the provider redirects back with ?code=...
//! client.set_authorization_code("code-from-callback");
//! let token = client.exchange_authorization_code().await?;
//! println!("Access token expires in {}s", token.expires_in);
//! # Ok(())
//! # }
//! ```

use crate::config::OAuthConfig;
use crate::connection::{Connection, HttpConnection, RawResponse};
use crate::error::{AuthError, Result};
use crate::token_store::{MemoryTokenStore, TokenStore};
use crate::types::{SessionState, Token, TokenResponse};
use bridge_traits::http::HttpRequest;
use bridge_traits::time::{Clock, SystemClock};
use core_runtime::config::CoreConfig;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use url::Url;

#[derive(Serialize)]
struct AuthorizationCodeRequest<'a> {
    grant_type: &'static str,
    code: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect_uri: Option<&'a str>,
}

#[derive(Serialize)]
struct RefreshTokenRequest<'a> {
    grant_type: &'static str,
    refresh_token: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    device_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    device_name: Option<&'a str>,
}

#[derive(Serialize)]
struct RevokeRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    token: &'a str,
}

fn to_params<T: Serialize>(request: &T) -> Result<Value> {
    serde_json::to_value(request)
        .map_err(|e| AuthError::InvalidInput(format!("Failed to build request params: {}", e)))
}

/// Decode a token endpoint response.
///
/// Any `error` key wins over every other field in the body.
fn decode_token_response(response: &RawResponse) -> Result<TokenResponse> {
    let body: Map<String, Value> = response.json()?;

    if let Some(error) = body.get("error") {
        let error = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let description = body
            .get("error_description")
            .and_then(Value::as_str)
            .map(str::to_string);

        warn!(
            status = response.status,
            error = %error,
            "Token endpoint returned an error"
        );

        return Err(AuthError::Provider { error, description });
    }

    serde_json::from_value(Value::Object(body)).map_err(|e| {
        AuthError::MalformedResponse(format!("Incomplete token response: {}", e))
    })
}

/// OAuth 2.0 client.
///
/// Owns the application credentials, the session token and the transport.
/// Generic over the [`Connection`] and [`TokenStore`] so tests and hosts can
/// swap either without boxing.
pub struct OAuthClient<C = HttpConnection, S = MemoryTokenStore> {
    config: OAuthConfig,
    connection: C,
    token_store: S,
    token: Token,
    clock: Arc<dyn Clock>,
    revoked: bool,
}

impl OAuthClient<HttpConnection, MemoryTokenStore> {
    /// Create a client using the transport and clock from `core`.
    pub fn from_core_config(config: OAuthConfig, core: &CoreConfig) -> Result<Self> {
        let client = Self::new(
            config,
            HttpConnection::from_core_config(core),
            MemoryTokenStore::default(),
        )?;
        Ok(client.with_clock(Arc::clone(&core.clock)))
    }
}

impl<C: Connection, S: TokenStore> OAuthClient<C, S> {
    /// Create a client with an explicit connection and token store.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if `config` fails validation.
    pub fn new(config: OAuthConfig, connection: C, token_store: S) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            connection,
            token_store,
            token: Token::default(),
            clock: Arc::new(SystemClock),
            revoked: false,
        })
    }

    /// Replace the clock used to stamp tokens.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Mutable access to credentials, for values learned mid-flow.
    pub fn config_mut(&mut self) -> &mut OAuthConfig {
        &mut self.config
    }

    /// Set the authorization code received on the redirect URI.
    pub fn set_authorization_code(&mut self, code: impl Into<String>) {
        self.config.authorization_code = Some(code.into());
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn token_store(&self) -> &S {
        &self.token_store
    }

    /// The client-owned token (empty until an exchange succeeds).
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Adopt a token obtained elsewhere.
    pub fn set_token(&mut self, token: Token) {
        self.token = token;
        self.revoked = false;
    }

    /// Current lifecycle position.
    pub fn state(&self) -> SessionState {
        if self.revoked {
            SessionState::Revoked
        } else if self.token.is_valid() {
            SessionState::Valid
        } else {
            SessionState::NoToken
        }
    }

    /// Build the interactive authorization URL.
    ///
    /// Query parameters: `response_type`, `client_id`, then `state` and
    /// `redirect_uri` when configured. Values are form-urlencoded, so a
    /// redirect URI with reserved characters is escaped.
    pub fn build_authorization_redirect_uri(&self) -> Result<Url> {
        let mut url = Url::parse(&self.config.endpoints.authorize_url)
            .map_err(|e| AuthError::Config(format!("Invalid authorize URL: {}", e)))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("response_type", &self.config.response_type);
            query.append_pair("client_id", &self.config.client_id);
            if let Some(state) = &self.config.state {
                query.append_pair("state", state);
            }
            if let Some(redirect_uri) = &self.config.redirect_uri {
                query.append_pair("redirect_uri", redirect_uri);
            }
        }

        debug!(client_id = %self.config.client_id, "Built authorization URL");

        Ok(url)
    }

    /// Issue the authorization request.
    ///
    /// The provider answers with a redirect to the login page, so there is
    /// nothing to return.
    #[instrument(skip(self), fields(client_id = %self.config.client_id))]
    pub async fn authorize(&self) -> Result<()> {
        let url = self.build_authorization_redirect_uri()?;
        let response = self.connection.get(url.as_str()).await?;

        debug!(status = response.status, "Authorization request sent");

        Ok(())
    }

    /// Exchange the configured authorization code for a token.
    ///
    /// The new token is persisted first. Only once the store accepts it is
    /// the client-owned token overwritten and returned, so every error
    /// leaves the client as it was.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidInput`] if no authorization code is set
    /// - [`AuthError::Provider`] if the response carries an `error` key
    /// - [`AuthError::MalformedResponse`] if the body is not a token payload
    /// - [`AuthError::NetworkError`] on transport failure
    /// - [`AuthError::TokenStore`] (or the store's own error) if saving fails
    #[instrument(skip(self), fields(client_id = %self.config.client_id))]
    pub async fn exchange_authorization_code(&mut self) -> Result<&Token> {
        let code = self.config.authorization_code.as_deref().ok_or_else(|| {
            AuthError::InvalidInput("authorization code has not been set".to_string())
        })?;

        let params = to_params(&AuthorizationCodeRequest {
            grant_type: "authorization_code",
            code,
            client_id: &self.config.client_id,
            client_secret: &self.config.client_secret,
            redirect_uri: self.config.redirect_uri.as_deref(),
        })?;

        debug!("Exchanging authorization code for tokens");

        let response = self.request_token(params).await?;
        self.commit_token(response).await?;

        info!(
            expires_in = self.token.expires_in,
            "Exchanged authorization code for tokens"
        );

        Ok(&self.token)
    }

    /// Refresh the client-owned token in place.
    ///
    /// Persists before committing, like
    /// [`exchange_authorization_code`](Self::exchange_authorization_code).
    #[instrument(skip(self), fields(client_id = %self.config.client_id))]
    pub async fn refresh_token(&mut self) -> Result<&Token> {
        let params = self.refresh_params(&self.token)?;

        debug!("Refreshing client token");

        let response = self.request_token(params).await?;
        self.commit_token(response).await?;

        info!(expires_in = self.token.expires_in, "Refreshed access token");

        Ok(&self.token)
    }

    /// Refresh a caller-held token in place.
    ///
    /// `token` is left untouched when the request fails. The client-owned
    /// token and the store are not involved.
    #[instrument(skip(self, token), fields(client_id = %self.config.client_id))]
    pub async fn refresh(&self, token: &mut Token) -> Result<()> {
        let params = self.refresh_params(token)?;

        debug!("Refreshing caller token");

        let response = self.request_token(params).await?;
        token.apply(response, self.clock.now());

        info!(expires_in = token.expires_in, "Refreshed access token");

        Ok(())
    }

    /// Revoke `token` at the provider and return the raw response.
    ///
    /// The response is not inspected for an `error` key and `token` is not
    /// modified.
    #[instrument(skip(self, token), fields(client_id = %self.config.client_id))]
    pub async fn revoke_token(&self, token: &Token) -> Result<RawResponse> {
        let params = to_params(&RevokeRequest {
            client_id: &self.config.client_id,
            client_secret: &self.config.client_secret,
            token: &token.access_token,
        })?;

        let response = self
            .connection
            .post(&self.config.endpoints.revoke_url, &params)
            .await?;

        info!(status = response.status, "Revocation request sent");

        Ok(response)
    }

    /// Revoke the client-owned token and clear the store.
    ///
    /// The in-memory token keeps its fields; [`state`](Self::state) reports
    /// [`SessionState::Revoked`] afterwards.
    ///
    /// The session is only marked revoked once the store is cleared. If
    /// clearing fails the error is returned and the state is unchanged,
    /// even though the provider has already seen the revocation.
    pub async fn revoke(&mut self) -> Result<RawResponse> {
        let response = self.revoke_token(&self.token).await?;
        self.token_store.clear().await?;
        self.revoked = true;
        Ok(response)
    }

    /// Load a previously persisted token into the client.
    ///
    /// Returns `true` when the store held a token.
    pub async fn restore_token(&mut self) -> Result<bool> {
        match self.token_store.load().await? {
            Some(token) => {
                self.set_token(token);
                debug!(state = %self.state(), "Restored token from store");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Value for the `Authorization` header of API calls.
    ///
    /// Returns the value only (`Bearer <access_token>`), not a full
    /// `Authorization: ...` header line.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotAuthenticated`] unless the client holds a
    /// valid, unrevoked token.
    pub fn authorization_header(&self) -> Result<String> {
        if self.state() != SessionState::Valid {
            return Err(AuthError::NotAuthenticated);
        }
        Ok(format!("Bearer {}", self.token.access_token))
    }

    /// Attach the bearer token to an outgoing API request.
    pub fn authorize_request(&self, request: HttpRequest) -> Result<HttpRequest> {
        if self.state() != SessionState::Valid {
            return Err(AuthError::NotAuthenticated);
        }
        Ok(request.bearer_token(self.token.access_token.clone()))
    }

    fn refresh_params(&self, token: &Token) -> Result<Value> {
        to_params(&RefreshTokenRequest {
            grant_type: "refresh_token",
            refresh_token: &token.refresh_token,
            client_id: &self.config.client_id,
            client_secret: &self.config.client_secret,
            device_id: self.config.device_id.as_deref(),
            device_name: self.config.device_name.as_deref(),
        })
    }

    async fn commit_token(&mut self, response: TokenResponse) -> Result<()> {
        let mut staged = self.token.clone();
        staged.apply(response, self.clock.now());

        self.token_store.save(&staged).await?;

        self.token = staged;
        self.revoked = false;
        Ok(())
    }

    async fn request_token(&self, params: Value) -> Result<TokenResponse> {
        let response = self
            .connection
            .post(&self.config.endpoints.token_url, &params)
            .await?;

        decode_token_response(&response)
    }
}

impl<C, S> std::fmt::Debug for OAuthClient<C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthClient")
            .field("config", &self.config)
            .field("token", &self.token)
            .field("revoked", &self.revoked)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AUTHORIZE_URL, REVOKE_URL, TOKEN_URL};
    use async_trait::async_trait;
    use bridge_traits::http::HttpMethod;
    use bridge_traits::time::FixedClock;
    use chrono::TimeZone;
    use mockall::mock;

    mock! {
        Connection {}

        #[async_trait]
        impl Connection for Connection {
            async fn get(&self, uri: &str) -> Result<RawResponse>;
            async fn post(&self, uri: &str, params: &Value) -> Result<RawResponse>;
        }
    }

    const TOKEN_BODY: &str = r#"{
        "access_token": "T9cE5asGnuyYCCqIZFoWjFHvNbvVqHjl",
        "expires_in": 3600,
        "restricted_to": [],
        "token_type": "bearer",
        "refresh_token": "J7rxTiWOHMoSC1isKZKBZWizoRXjkQzig5C6jFgCVJ9bUnsUfGMinKBDLZWP9BgR"
    }"#;

    const REFRESHED_BODY: &str = r#"{
        "access_token": "new-access",
        "expires_in": 4000,
        "token_type": "bearer",
        "refresh_token": "new-refresh"
    }"#;

    fn config() -> OAuthConfig {
        OAuthConfig::new("client-id", "client-secret")
            .with_redirect_uri("https://app.example.com/callback")
            .with_state("state-123")
            .with_authorization_code("auth-code")
    }

    fn client(connection: MockConnection) -> OAuthClient<MockConnection, MemoryTokenStore> {
        let issued = chrono::Utc.with_ymd_and_hms(2013, 6, 1, 12, 0, 0).unwrap();
        OAuthClient::new(config(), connection, MemoryTokenStore::default())
            .unwrap()
            .with_clock(Arc::new(FixedClock(issued)))
    }

    fn valid_token() -> Token {
        Token {
            access_token: "old-access".to_string(),
            refresh_token: "old-refresh".to_string(),
            expires_in: 3600,
            token_type: "bearer".to_string(),
            obtained_at: None,
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = OAuthClient::new(
            OAuthConfig::new("", "secret"),
            MockConnection::new(),
            MemoryTokenStore::default(),
        );
        assert!(matches!(result, Err(AuthError::Config(_))));
    }

    #[test]
    fn test_build_authorization_redirect_uri() {
        let client = client(MockConnection::new());
        let url = client.build_authorization_redirect_uri().unwrap();

        assert!(url.as_str().starts_with(AUTHORIZE_URL));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("response_type".to_string(), "code".to_string()),
                ("client_id".to_string(), "client-id".to_string()),
                ("state".to_string(), "state-123".to_string()),
                (
                    "redirect_uri".to_string(),
                    "https://app.example.com/callback".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_build_authorization_redirect_uri_encodes_reserved_characters() {
        let mut client = client(MockConnection::new());
        client.config_mut().redirect_uri =
            Some("https://app.example.com/cb?next=/home&x=1 y".to_string());

        let url = client.build_authorization_redirect_uri().unwrap();

        assert!(url.as_str().contains(
            "redirect_uri=https%3A%2F%2Fapp.example.com%2Fcb%3Fnext%3D%2Fhome%26x%3D1+y"
        ));
    }

    #[test]
    fn test_build_authorization_redirect_uri_without_optional_params() {
        let client = OAuthClient::new(
            OAuthConfig::new("client-id", "client-secret"),
            MockConnection::new(),
            MemoryTokenStore::default(),
        )
        .unwrap();

        let url = client.build_authorization_redirect_uri().unwrap();
        assert_eq!(url.query(), Some("response_type=code&client_id=client-id"));
    }

    #[tokio::test]
    async fn test_authorize_issues_get() {
        let mut connection = MockConnection::new();
        connection
            .expect_get()
            .withf(|uri| uri.starts_with(AUTHORIZE_URL) && uri.contains("response_type=code"))
            .times(1)
            .returning(|_| Ok(RawResponse::new(302, "")));

        let client = client(connection);
        assert!(client.authorize().await.is_ok());
    }

    #[tokio::test]
    async fn test_exchange_populates_token_from_response() {
        let mut connection = MockConnection::new();
        connection
            .expect_post()
            .withf(|uri, params| {
                uri == TOKEN_URL
                    && params["grant_type"] == "authorization_code"
                    && params["code"] == "auth-code"
                    && params["client_id"] == "client-id"
                    && params["client_secret"] == "client-secret"
                    && params["redirect_uri"] == "https://app.example.com/callback"
            })
            .times(1)
            .returning(|_, _| Ok(RawResponse::new(200, TOKEN_BODY)));

        let mut client = client(connection);
        let token = client.exchange_authorization_code().await.unwrap();

        assert_eq!(token.access_token, "T9cE5asGnuyYCCqIZFoWjFHvNbvVqHjl");
        assert_eq!(
            token.refresh_token,
            "J7rxTiWOHMoSC1isKZKBZWizoRXjkQzig5C6jFgCVJ9bUnsUfGMinKBDLZWP9BgR"
        );
        assert_eq!(token.expires_in, 3600);
        assert_eq!(token.token_type, "bearer");
        assert!(token.obtained_at.is_some());
        assert_eq!(client.state(), SessionState::Valid);

        let stored = client.token_store().load().await.unwrap().unwrap();
        assert_eq!(&stored, client.token());
    }

    #[tokio::test]
    async fn test_exchange_omits_redirect_uri_when_unset() {
        let mut connection = MockConnection::new();
        connection
            .expect_post()
            .withf(|_, params| params.get("redirect_uri").is_none())
            .times(1)
            .returning(|_, _| Ok(RawResponse::new(200, TOKEN_BODY)));

        let mut client = client(connection);
        client.config_mut().redirect_uri = None;

        assert!(client.exchange_authorization_code().await.is_ok());
    }

    #[tokio::test]
    async fn test_exchange_without_code_is_invalid_input() {
        let mut connection = MockConnection::new();
        connection.expect_post().times(0);

        let mut client = client(connection);
        client.config_mut().authorization_code = None;

        let result = client.exchange_authorization_code().await;
        assert!(matches!(result, Err(AuthError::InvalidInput(_))));
        assert_eq!(client.state(), SessionState::NoToken);
    }

    #[tokio::test]
    async fn test_exchange_error_key_raises_provider_error() {
        let mut connection = MockConnection::new();
        connection.expect_post().times(1).returning(|_, _| {
            Ok(RawResponse::new(
                400,
                r#"{
                    "error": "invalid_grant",
                    "error_description": "Auth code doesn't exist or is invalid for the client",
                    "access_token": "should-be-ignored",
                    "refresh_token": "should-be-ignored",
                    "expires_in": 3600,
                    "token_type": "bearer"
                }"#,
            ))
        });

        let mut client = client(connection);
        let err = client.exchange_authorization_code().await.unwrap_err();

        match err {
            AuthError::Provider { error, description } => {
                assert_eq!(error, "invalid_grant");
                assert_eq!(
                    description.as_deref(),
                    Some("Auth code doesn't exist or is invalid for the client")
                );
            }
            other => panic!("expected provider error, got {:?}", other),
        }
        assert!(client.token().access_token.is_empty());
        assert!(client.token_store().load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_error_key_on_success_status_still_raises() {
        let mut connection = MockConnection::new();
        connection
            .expect_post()
            .returning(|_, _| Ok(RawResponse::new(200, r#"{"error":"invalid_client"}"#)));

        let mut client = client(connection);
        let err = client.exchange_authorization_code().await.unwrap_err();

        assert_eq!(err.provider_error(), Some("invalid_client"));
        assert!(matches!(err, AuthError::Provider { description: None, .. }));
    }

    #[tokio::test]
    async fn test_incomplete_success_body_is_malformed() {
        let mut connection = MockConnection::new();
        connection.expect_post().returning(|_, _| {
            Ok(RawResponse::new(
                200,
                r#"{"access_token":"a","expires_in":3600,"token_type":"bearer"}"#,
            ))
        });

        let mut client = client(connection);
        let result = client.exchange_authorization_code().await;

        assert!(matches!(result, Err(AuthError::MalformedResponse(_))));
        assert_eq!(client.state(), SessionState::NoToken);
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let mut connection = MockConnection::new();
        connection
            .expect_post()
            .returning(|_, _| Ok(RawResponse::new(503, "Service Unavailable")));

        let mut client = client(connection);
        let result = client.exchange_authorization_code().await;

        assert!(matches!(result, Err(AuthError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_refresh_token_sends_device_params() {
        let mut connection = MockConnection::new();
        connection
            .expect_post()
            .withf(|uri, params| {
                uri == TOKEN_URL
                    && params["grant_type"] == "refresh_token"
                    && params["refresh_token"] == "old-refresh"
                    && params["device_id"] == "device-1"
                    && params["device_name"] == "Laptop"
            })
            .times(1)
            .returning(|_, _| Ok(RawResponse::new(200, REFRESHED_BODY)));

        let mut client = client(connection);
        client.config_mut().device_id = Some("device-1".to_string());
        client.config_mut().device_name = Some("Laptop".to_string());
        client.set_token(valid_token());

        let token = client.refresh_token().await.unwrap();
        assert_eq!(token.access_token, "new-access");
        assert_eq!(token.refresh_token, "new-refresh");
        assert_eq!(token.expires_in, 4000);
    }

    #[tokio::test]
    async fn test_refresh_omits_device_params_when_unset() {
        let mut connection = MockConnection::new();
        connection
            .expect_post()
            .withf(|_, params| {
                params.get("device_id").is_none() && params.get("device_name").is_none()
            })
            .times(1)
            .returning(|_, _| Ok(RawResponse::new(200, REFRESHED_BODY)));

        let client = client(connection);
        let mut token = valid_token();

        client.refresh(&mut token).await.unwrap();
        assert_eq!(token.access_token, "new-access");
    }

    #[tokio::test]
    async fn test_refresh_mutates_same_token_in_place() {
        let mut connection = MockConnection::new();
        connection
            .expect_post()
            .returning(|_, _| Ok(RawResponse::new(200, REFRESHED_BODY)));

        let mut client = client(connection);
        client.set_token(valid_token());

        let before: *const Token = client.token();
        let after: *const Token = client.refresh_token().await.unwrap();

        assert!(std::ptr::eq(before, after));
        assert_eq!(client.token().access_token, "new-access");
    }

    #[tokio::test]
    async fn test_refresh_failure_leaves_token_untouched() {
        let mut connection = MockConnection::new();
        connection.expect_post().returning(|_, _| {
            Ok(RawResponse::new(
                400,
                r#"{"error":"invalid_grant","error_description":"Refresh token has expired"}"#,
            ))
        });

        let client = client(connection);
        let mut token = valid_token();

        let err = client.refresh(&mut token).await.unwrap_err();
        assert_eq!(err.provider_error(), Some("invalid_grant"));
        assert_eq!(token, valid_token());
    }

    #[tokio::test]
    async fn test_revoke_token_leaves_token_fields() {
        let mut connection = MockConnection::new();
        connection
            .expect_post()
            .withf(|uri, params| {
                uri == REVOKE_URL
                    && params["token"] == "old-access"
                    && params["client_id"] == "client-id"
                    && params["client_secret"] == "client-secret"
                    && params.get("grant_type").is_none()
            })
            .times(1)
            .returning(|_, _| Ok(RawResponse::new(200, "")));

        let client = client(connection);
        let token = valid_token();

        let response = client.revoke_token(&token).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(token, valid_token());
    }

    #[tokio::test]
    async fn test_revoke_ignores_error_key() {
        let mut connection = MockConnection::new();
        connection
            .expect_post()
            .returning(|_, _| Ok(RawResponse::new(400, r#"{"error":"invalid_request"}"#)));

        let client = client(connection);
        let response = client.revoke_token(&valid_token()).await.unwrap();

        assert_eq!(response.status, 400);
    }

    #[tokio::test]
    async fn test_revoke_marks_session_and_clears_store() {
        let mut connection = MockConnection::new();
        connection
            .expect_post()
            .withf(|uri, _| uri == REVOKE_URL)
            .returning(|_, _| Ok(RawResponse::new(200, "")));

        let mut client = client(connection);
        client.set_token(valid_token());
        client.token_store().save(&valid_token()).await.unwrap();

        client.revoke().await.unwrap();

        assert_eq!(client.state(), SessionState::Revoked);
        assert_eq!(client.token(), &valid_token());
        assert!(client.token_store().load().await.unwrap().is_none());
        assert!(matches!(
            client.authorization_header(),
            Err(AuthError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_restore_token() {
        let mut client = client(MockConnection::new());
        assert!(!client.restore_token().await.unwrap());

        client.token_store().save(&valid_token()).await.unwrap();
        assert!(client.restore_token().await.unwrap());
        assert_eq!(client.state(), SessionState::Valid);
    }

    #[test]
    fn test_authorization_header() {
        let mut client = client(MockConnection::new());
        assert!(matches!(
            client.authorization_header(),
            Err(AuthError::NotAuthenticated)
        ));

        client.set_token(valid_token());
        let header = client.authorization_header().unwrap();
        assert_eq!(header, "Bearer old-access");
        assert!(!header.starts_with("Authorization"));

        let request = client
            .authorize_request(HttpRequest::new(
                HttpMethod::Get,
                "https://api.box.com/2.0/folders/0",
            ))
            .unwrap();
        assert_eq!(
            request.headers.get("Authorization"),
            Some(&"Bearer old-access".to_string())
        );
    }

    #[test]
    fn test_debug_redacts_client_secret() {
        let client = client(MockConnection::new());
        let debug = format!("{:?}", client);
        assert!(!debug.contains("client-secret"));
        assert!(debug.contains("client-id"));
    }
}
