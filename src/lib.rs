//! Workspace facade crate.
//!
//! Re-exports the OAuth client (`core-auth`) and the runtime helpers
//! (`core-runtime`) so host applications can depend on `box-oauth` and pick
//! a feature set instead of wiring each crate individually.
//!
//! - `desktop-shims` (default): the reqwest-backed HTTP client is injected
//!   automatically when none is configured.
//! - `core`: the same API without any platform adapter; the host must
//!   provide its own `HttpClient`.

#[cfg(any(feature = "desktop-shims", feature = "core"))]
pub use core_auth::*;

#[cfg(any(feature = "desktop-shims", feature = "core"))]
pub use core_runtime::{config as runtime_config, logging};
