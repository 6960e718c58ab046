//! OAuth application credentials and provider endpoints.

use crate::error::{AuthError, Result};
use std::fmt;
use url::Url;

/// Box interactive authorization endpoint
pub const AUTHORIZE_URL: &str = "https://www.box.com/api/oauth2/authorize";
/// Box token endpoint (code exchange and refresh)
pub const TOKEN_URL: &str = "https://www.box.com/api/oauth2/token";
/// Box token revocation endpoint
pub const REVOKE_URL: &str = "https://www.box.com/api/oauth2/revoke";

/// Provider endpoint set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub authorize_url: String,
    pub token_url: String,
    pub revoke_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            authorize_url: AUTHORIZE_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
            revoke_url: REVOKE_URL.to_string(),
        }
    }
}

impl Endpoints {
    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("authorize_url", &self.authorize_url),
            ("token_url", &self.token_url),
            ("revoke_url", &self.revoke_url),
        ] {
            Url::parse(value)
                .map_err(|e| AuthError::Config(format!("Invalid {}: {}", name, e)))?;
        }
        Ok(())
    }
}

/// OAuth 2.0 client configuration.
///
/// Holds the application credentials registered with the provider plus the
/// per-session values (authorization code, state, device identifiers) the
/// caller sets before each flow step.
///
/// # Examples
///
/// ```
/// use core_auth::OAuthConfig;
///
/// let config = OAuthConfig::new("client-id", "client-secret")
///     .with_redirect_uri("https://app.example.com/callback")
///     .with_state("security_token=KnhMJatFipTAnM0nHlZA")
///     .with_device("device-1", "Work laptop");
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone)]
pub struct OAuthConfig {
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Redirect URI registered with the application
    pub redirect_uri: Option<String>,
    /// Authorization code delivered to the redirect URI
    pub authorization_code: Option<String>,
    /// Device identifier sent on refresh
    pub device_id: Option<String>,
    /// Human-readable device name sent on refresh
    pub device_name: Option<String>,
    /// Opaque CSRF state echoed back by the provider
    pub state: Option<String>,
    /// Value of the `response_type` authorization parameter
    pub response_type: String,
    /// Provider endpoints
    pub endpoints: Endpoints,
}

impl OAuthConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: None,
            authorization_code: None,
            device_id: None,
            device_name: None,
            state: None,
            response_type: "code".to_string(),
            endpoints: Endpoints::default(),
        }
    }

    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    pub fn with_authorization_code(mut self, code: impl Into<String>) -> Self {
        self.authorization_code = Some(code.into());
        self
    }

    pub fn with_device(mut self, device_id: impl Into<String>, device_name: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self.device_name = Some(device_name.into());
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Validates the configuration.
    ///
    /// This checks:
    /// - Client ID and secret are not empty
    /// - `response_type` is not empty
    /// - Every endpoint parses as a URL
    /// - The redirect URI, when set, is an absolute URL
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(AuthError::Config("Client ID cannot be empty".to_string()));
        }

        if self.client_secret.trim().is_empty() {
            return Err(AuthError::Config(
                "Client secret cannot be empty".to_string(),
            ));
        }

        if self.response_type.trim().is_empty() {
            return Err(AuthError::Config(
                "Response type cannot be empty".to_string(),
            ));
        }

        self.endpoints.validate()?;

        if let Some(redirect_uri) = &self.redirect_uri {
            Url::parse(redirect_uri)
                .map_err(|e| AuthError::Config(format!("Invalid redirect URI: {}", e)))?;
        }

        Ok(())
    }
}

impl fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field(
                "authorization_code",
                &self.authorization_code.as_ref().map(|_| "[REDACTED]"),
            )
            .field("device_id", &self.device_id)
            .field("device_name", &self.device_name)
            .field("state", &self.state)
            .field("response_type", &self.response_type)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints_point_at_box() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.authorize_url, AUTHORIZE_URL);
        assert_eq!(endpoints.token_url, TOKEN_URL);
        assert_eq!(endpoints.revoke_url, REVOKE_URL);
    }

    #[test]
    fn test_config_builder() {
        let config = OAuthConfig::new("id", "secret")
            .with_redirect_uri("http://localhost:8080/callback")
            .with_authorization_code("code")
            .with_device("dev-1", "Laptop")
            .with_state("xyz");

        assert_eq!(config.client_id, "id");
        assert_eq!(config.redirect_uri.as_deref(), Some("http://localhost:8080/callback"));
        assert_eq!(config.authorization_code.as_deref(), Some("code"));
        assert_eq!(config.device_id.as_deref(), Some("dev-1"));
        assert_eq!(config.device_name.as_deref(), Some("Laptop"));
        assert_eq!(config.state.as_deref(), Some("xyz"));
        assert_eq!(config.response_type, "code");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_credentials() {
        assert!(matches!(
            OAuthConfig::new("", "secret").validate(),
            Err(AuthError::Config(_))
        ));
        assert!(matches!(
            OAuthConfig::new("id", " ").validate(),
            Err(AuthError::Config(_))
        ));
    }

    #[test]
    fn test_validate_rejects_relative_redirect_uri() {
        let config = OAuthConfig::new("id", "secret").with_redirect_uri("/callback");
        assert!(matches!(config.validate(), Err(AuthError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let config = OAuthConfig::new("id", "secret").with_endpoints(Endpoints {
            token_url: "not a url".to_string(),
            ..Endpoints::default()
        });

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("token_url"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = OAuthConfig::new("id", "very-secret").with_authorization_code("auth-code");
        let debug = format!("{:?}", config);

        assert!(!debug.contains("very-secret"));
        assert!(!debug.contains("auth-code"));
        assert!(debug.contains("[REDACTED]"));
    }
}
