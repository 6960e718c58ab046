//! Token persistence
//!
//! The client writes through a [`TokenStore`] after every successful
//! exchange or refresh and clears it on revoke. Hosts that need durable
//! storage (keychain, database) implement the trait; [`MemoryTokenStore`]
//! is the default and keeps the token for the lifetime of the process.
//!
//! ## Example
//!
//! ```
//! use core_auth::{MemoryTokenStore, Token, TokenStore};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> core_auth::Result<()> {
//! let store = MemoryTokenStore::default();
//! assert!(store.load().await?.is_none());
//!
//! store.save(&Token::default()).await?;
//! assert!(store.load().await?.is_some());
//!
//! store.clear().await?;
//! assert!(store.load().await?.is_none());
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use crate::types::Token;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Persistence seam for the client-owned token.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the persisted token, if any.
    async fn load(&self) -> Result<Option<Token>>;

    /// Persist `token`, replacing any previous value.
    async fn save(&self, token: &Token) -> Result<()>;

    /// Remove the persisted token.
    async fn clear(&self) -> Result<()>;
}

/// In-process token store.
///
/// Clones share the same slot, so a host can keep a handle while the client
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<RwLock<Option<Token>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<Token>> {
        Ok(self.slot.read().await.clone())
    }

    async fn save(&self, token: &Token) -> Result<()> {
        *self.slot.write().await = Some(token.clone());
        debug!(has_refresh_token = !token.refresh_token.is_empty(), "Token stored in memory");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.slot.write().await = None;
        debug!("Token cleared from memory");
        Ok(())
    }
}
