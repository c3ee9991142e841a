//! Login completion
//!
//! The identity provider sends the user back to a callback URL carrying the
//! freshly issued token in its query string. Completing the login stores that
//! token and decides where to go next. There are only two outcomes and no
//! retry.

use url::Url;

use super::TokenCache;
use crate::storage::KeyValueStore;

/// Origin used to resolve callback paths given without scheme and host.
const LOCAL_ORIGIN: &str = "http://localhost/";

const TOKEN_PARAM: &str = "token";
const REFRESH_TOKEN_PARAM: &str = "refreshToken";

/// Routes the callback may redirect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRoutes {
    /// Authenticated landing page
    pub home: String,
    /// Login entry point; failures append `?error=auth_failed`
    pub login: String,
}

impl Default for LoginRoutes {
    fn default() -> Self {
        Self {
            home: "/dashboard".to_string(),
            login: "/login".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Token stored, continue to the authenticated area.
    Success { redirect: String },
    /// No usable token, back to the login page with an error marker.
    Failure { redirect: String },
}

impl LoginOutcome {
    pub fn redirect(&self) -> &str {
        match self {
            Self::Success { redirect } | Self::Failure { redirect } => redirect,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Store the token carried by `callback_url` and pick the redirect.
///
/// A missing or empty `token` parameter, an unparseable URL, or a failed
/// store write all end in [`LoginOutcome::Failure`].
pub fn complete_login<S: KeyValueStore>(
    cache: &TokenCache<S>,
    callback_url: &str,
    routes: &LoginRoutes,
) -> LoginOutcome {
    let failure = || LoginOutcome::Failure {
        redirect: format!("{}?error=auth_failed", routes.login),
    };

    let url = match parse_callback(callback_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Unparseable login callback URL: {}", e);
            return failure();
        }
    };

    let Some(token) = query_param(&url, TOKEN_PARAM) else {
        tracing::warn!("Login callback carried no token");
        return failure();
    };

    let stored = match query_param(&url, REFRESH_TOKEN_PARAM) {
        Some(refresh) => cache.set_tokens(&token, &refresh),
        None => cache.set_access_token(&token),
    };
    if let Err(e) = stored {
        tracing::warn!("Failed to store login token: {:#}", e);
        return failure();
    }

    tracing::info!("Login completed");
    LoginOutcome::Success {
        redirect: routes.home.clone(),
    }
}

fn parse_callback(input: &str) -> Result<Url, url::ParseError> {
    match Url::parse(input) {
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(LOCAL_ORIGIN)?.join(input),
        other => other,
    }
}

fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
