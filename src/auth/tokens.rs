//! Access/refresh token cache
//!
//! Credentials live in a [`KeyValueStore`] under the same keys the web
//! front-end uses in local storage. A failed refresh of any kind ends the
//! session: both tokens are dropped and the caller just sees `None`.

use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStore, StorageError};

pub const ACCESS_TOKEN_KEY: &str = "authToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

const REFRESH_PATH: &str = "/auth/refresh";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
}

#[derive(Debug, thiserror::Error)]
enum RefreshError {
    /// Network failure or an unreadable response body
    #[error("refresh request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("refresh rejected (HTTP {status})")]
    Rejected { status: u16 },
}

/// Storage-backed credential cache.
///
/// Owned by the application root and lent out by reference. There is no guard
/// against overlapping refreshes; concurrent callers each read and write the
/// store and the last write wins.
pub struct TokenCache<S> {
    store: S,
    http: reqwest::Client,
    refresh_url: String,
}

impl<S: KeyValueStore> TokenCache<S> {
    pub fn new(store: S, api_base: &str) -> Self {
        Self::with_client(store, reqwest::Client::new(), api_base)
    }

    pub fn with_client(store: S, http: reqwest::Client, api_base: &str) -> Self {
        Self {
            store,
            http,
            refresh_url: format!("{}{}", api_base.trim_end_matches('/'), REFRESH_PATH),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Overwrite both tokens.
    pub fn set_tokens(&self, access: &str, refresh: &str) -> Result<(), StorageError> {
        self.store
            .set_items(&[(ACCESS_TOKEN_KEY, access), (REFRESH_TOKEN_KEY, refresh)])
    }

    /// Overwrite the access token, leaving any refresh token in place.
    pub fn set_access_token(&self, access: &str) -> Result<(), StorageError> {
        self.store.set_item(ACCESS_TOKEN_KEY, access)
    }

    pub fn get_access_token(&self) -> Option<String> {
        self.store.get_item(ACCESS_TOKEN_KEY)
    }

    pub fn get_refresh_token(&self) -> Option<String> {
        self.store.get_item(REFRESH_TOKEN_KEY)
    }

    pub fn has_session(&self) -> bool {
        self.get_access_token().is_some()
    }

    /// Remove both tokens. Safe to call when nothing is cached.
    pub fn clear_tokens(&self) -> Result<(), StorageError> {
        self.store.remove_items(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY])
    }

    /// Mint a new access token from the cached refresh token.
    ///
    /// Returns `None` without touching the network when no refresh token is
    /// cached. Any failure clears both tokens and also returns `None`. On
    /// success only the access token is replaced.
    pub async fn refresh_access_token(&self) -> Option<String> {
        let refresh_token = self.get_refresh_token()?;

        tracing::info!("Refreshing access token...");

        match self.request_refresh(&refresh_token).await {
            Ok(access) => {
                if let Err(e) = self.set_access_token(&access) {
                    tracing::warn!("Failed to persist refreshed access token: {:#}", e);
                }
                tracing::info!("Access token refreshed");
                Some(access)
            }
            Err(e) => {
                tracing::warn!("Token refresh failed, clearing session: {}", e);
                if let Err(e) = self.clear_tokens() {
                    tracing::warn!("Failed to clear cached tokens: {:#}", e);
                }
                None
            }
        }
    }

    async fn request_refresh(&self, refresh_token: &str) -> Result<String, RefreshError> {
        tracing::debug!("POST {}", self.refresh_url);

        let resp = self
            .http
            .post(&self.refresh_url)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RefreshError::Rejected {
                status: status.as_u16(),
            });
        }

        let body: RefreshResponse = resp.json().await?;
        Ok(body.access_token)
    }
}
