//! Session commands: login, logout, status, refresh

use anyhow::{bail, Context, Result};

use super::{complete_login, TokenCache};
use crate::config::Settings;
use crate::storage::KeyValueStore;

/// Complete a login from the callback URL the browser was sent to.
pub fn login<S: KeyValueStore>(
    cache: &TokenCache<S>,
    settings: &Settings,
    callback_url: &str,
) -> Result<()> {
    let outcome = complete_login(cache, callback_url, &settings.routes());
    if !outcome.is_success() {
        bail!("Login failed (redirect: {}).", outcome.redirect());
    }

    println!("Login successful.");
    println!("Continue at: {}", outcome.redirect());
    Ok(())
}

/// Clear stored credentials
pub fn logout<S: KeyValueStore>(cache: &TokenCache<S>) -> Result<()> {
    cache
        .clear_tokens()
        .context("Failed to clear cached tokens")?;
    println!("Logged out.");
    Ok(())
}

/// Display which credentials are cached
pub fn status<S: KeyValueStore>(cache: &TokenCache<S>) {
    match cache.get_access_token() {
        Some(_) => println!("Access token:  present"),
        None => println!("Access token:  none"),
    }
    match cache.get_refresh_token() {
        Some(_) => println!("Refresh token: present"),
        None => println!("Refresh token: none"),
    }

    if !cache.has_session() {
        println!("\nRun 'qbank-cli login <callback-url>' to authenticate.");
    }
}

/// Force a refresh of the access token
pub async fn refresh<S: KeyValueStore>(cache: &TokenCache<S>) -> Result<()> {
    match cache.refresh_access_token().await {
        Some(_) => {
            println!("Access token refreshed.");
            Ok(())
        }
        None => bail!("No active session. Run 'qbank-cli login'."),
    }
}
