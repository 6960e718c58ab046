use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// The provider answered with an `error` field.
    #[error("Provider rejected the request: {error} ({})", .description.as_deref().unwrap_or("no description"))]
    Provider {
        error: String,
        description: Option<String>,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Token store failure: {0}")]
    TokenStore(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl AuthError {
    /// Provider error code (`invalid_grant`, `invalid_client`, ...) if this
    /// error came from the provider.
    pub fn provider_error(&self) -> Option<&str> {
        match self {
            AuthError::Provider { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<BridgeError> for AuthError {
    fn from(error: BridgeError) -> Self {
        AuthError::NetworkError(error.to_string())
    }
}

impl From<core_runtime::Error> for AuthError {
    fn from(error: core_runtime::Error) -> Self {
        AuthError::Config(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
