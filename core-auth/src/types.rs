use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds before the reported expiry at which a token counts as expired.
pub const DEFAULT_EXPIRY_BUFFER_SECS: i64 = 300;

/// OAuth 2.0 token set.
///
/// Created empty, populated from a successful token response and mutated in
/// place on refresh. The four wire fields mirror the provider response
/// exactly; `obtained_at` is stamped locally so expiry can be computed.
///
/// # Security
///
/// The `Debug` implementation redacts both token strings.
///
/// # Examples
///
/// ```
/// use core_auth::Token;
///
/// let token = Token::default();
/// assert!(!token.is_valid());
///
/// let token = Token {
///     access_token: "T9cE5asGnuyYCCqIZFoWjFHvNbvVqHjl".to_string(),
///     refresh_token: "J7rxTiWOHMoSC1isKZKBZWizoRXjkQzig5C6jFgCVJ9bUnsUfGMinKBDLZWP9BgR".to_string(),
///     expires_in: 3600,
///     token_type: "bearer".to_string(),
///     obtained_at: None,
/// };
/// assert!(token.is_valid());
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The access token used for API requests
    pub access_token: String,
    /// The refresh token used to obtain new access tokens
    pub refresh_token: String,
    /// Lifetime of the access token in seconds, as reported by the provider
    pub expires_in: i64,
    /// Token type, `bearer` for Box
    pub token_type: String,
    /// When the fields were last populated from the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obtained_at: Option<DateTime<Utc>>,
}

impl Token {
    /// A token is valid once access token, token type and refresh token
    /// have all been set from a successful response.
    pub fn is_valid(&self) -> bool {
        !self.access_token.is_empty()
            && !self.token_type.is_empty()
            && !self.refresh_token.is_empty()
    }

    /// Absolute expiry, known only once the token was stamped.
    ///
    /// `None` when the reported lifetime does not fit in a timestamp.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let obtained = self.obtained_at?;
        obtained.checked_add_signed(TimeDelta::try_seconds(self.expires_in)?)
    }

    /// Check if the access token is expired or will expire within the
    /// default buffer.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now(), DEFAULT_EXPIRY_BUFFER_SECS)
    }

    /// Check expiry against an explicit instant and buffer.
    ///
    /// Tokens without a computable expiry are treated as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>, buffer_seconds: i64) -> bool {
        let refresh_at = self.expires_at().and_then(|expires_at| {
            expires_at.checked_sub_signed(TimeDelta::try_seconds(buffer_seconds)?)
        });
        match refresh_at {
            Some(refresh_at) => now >= refresh_at,
            None => true,
        }
    }

    /// Overwrite the wire fields from a successful provider response.
    pub(crate) fn apply(&mut self, response: TokenResponse, obtained_at: DateTime<Utc>) {
        self.access_token = response.access_token;
        self.expires_in = response.expires_in;
        self.token_type = response.token_type;
        self.refresh_token = response.refresh_token;
        self.obtained_at = Some(obtained_at);
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .field("obtained_at", &self.obtained_at)
            .finish()
    }
}

/// Successful token endpoint payload.
#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    pub(crate) access_token: String,
    pub(crate) refresh_token: String,
    pub(crate) expires_in: i64,
    pub(crate) token_type: String,
}

/// Where a client sits in the token lifecycle.
///
/// ```text
/// NoToken -> (exchange) -> Valid -> (refresh) -> Valid -> (revoke) -> Revoked
/// ```
///
/// Reported for observability only; no operation is gated on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    NoToken,
    Valid,
    Revoked,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::NoToken => write!(f, "No Token"),
            SessionState::Valid => write!(f, "Valid"),
            SessionState::Revoked => write!(f, "Revoked"),
        }
    }
}
