//! Box OAuth walkthrough
//!
//! Prints the authorization URL for the configured application. When an
//! authorization code is supplied it is exchanged, refreshed once and then
//! revoked.
//!
//! Run with:
//! ```bash
//! export BOX_CLIENT_ID=... BOX_CLIENT_SECRET=...
//! export BOX_REDIRECT_URI=https://localhost/callback
//! cargo run -p core-auth --features desktop-shims --example authorize_demo
//!
//! # After approving access in the browser
//! BOX_AUTH_CODE=... cargo run -p core-auth --features desktop-shims --example authorize_demo
//! ```

use anyhow::Context;
use bridge_traits::time::LogLevel;
use core_auth::{OAuthClient, OAuthConfig};
use core_runtime::config::CoreConfig;
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use std::env;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(
        LoggingConfig::default()
            .with_format(LogFormat::Compact)
            .with_level(LogLevel::Debug),
    )?;

    let client_id = env::var("BOX_CLIENT_ID").context("BOX_CLIENT_ID is not set")?;
    let client_secret = env::var("BOX_CLIENT_SECRET").context("BOX_CLIENT_SECRET is not set")?;

    let mut config = OAuthConfig::new(client_id, client_secret)
        .with_state("security_token=demo")
        .with_device("authorize-demo", "Authorize demo");
    if let Ok(redirect_uri) = env::var("BOX_REDIRECT_URI") {
        config = config.with_redirect_uri(redirect_uri);
    }

    let core = CoreConfig::builder()
        .request_timeout(Duration::from_secs(30))
        .build()?;
    let mut client = OAuthClient::from_core_config(config, &core)?;

    println!("Authorize at: {}", client.build_authorization_redirect_uri()?);

    let Ok(code) = env::var("BOX_AUTH_CODE") else {
        return Ok(());
    };
    client.set_authorization_code(code);

    let token = client.exchange_authorization_code().await?;
    info!(expires_at = ?token.expires_at(), "Token obtained");

    client.refresh_token().await?;
    info!(state = %client.state(), "Token refreshed");

    let response = client.revoke().await?;
    info!(status = response.status, state = %client.state(), "Token revoked");

    Ok(())
}
