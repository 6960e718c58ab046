//! # Box OAuth 2.0
//!
//! Thin client for the Box OAuth 2.0 endpoints.
//!
//! ## Overview
//!
//! This crate drives the authorization code flow against Box: it builds the
//! interactive authorization URL, exchanges the returned code for a token,
//! refreshes that token in place and revokes it. Each operation maps to a
//! single HTTP request issued through a pluggable [`Connection`].
//!
//! ## Features
//!
//! - Authorization URL construction with state and redirect URI
//! - Code exchange and in-place refresh with device identification
//! - Token revocation
//! - Provider error bodies surfaced as [`AuthError::Provider`]
//! - Token persistence through [`TokenStore`]

pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod token_store;
pub mod types;

pub use client::OAuthClient;
pub use config::{Endpoints, OAuthConfig, AUTHORIZE_URL, REVOKE_URL, TOKEN_URL};
pub use connection::{encode_form, Connection, ConnectionConfig, HttpConnection, RawResponse};
pub use error::{AuthError, Result};
pub use token_store::{MemoryTokenStore, TokenStore};
pub use types::{SessionState, Token, DEFAULT_EXPIRY_BUFFER_SECS};
