//! Authenticated HTTP client for the question bank API
//!
//! Wraps reqwest::Client with bearer token injection. A rejected access token
//! triggers one refresh and one retry.

use anyhow::{bail, Context, Result};

use crate::auth::TokenCache;
use crate::models::User;
use crate::storage::KeyValueStore;

pub struct ApiClient<'a, S> {
    http: reqwest::Client,
    api_base: String,
    tokens: &'a TokenCache<S>,
}

impl<'a, S: KeyValueStore> ApiClient<'a, S> {
    pub fn new(api_base: &str, tokens: &'a TokenCache<S>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    /// GET `{api_base}{path}` with the cached access token.
    pub async fn get(&self, path: &str) -> Result<reqwest::Response> {
        let token = self
            .tokens
            .get_access_token()
            .context("Not logged in. Run 'qbank-cli login' first.")?;
        let url = format!("{}{}", self.api_base, path);

        let resp = self.send_get(&url, &token).await?;
        if resp.status() != reqwest::StatusCode::UNAUTHORIZED {
            return check_response(resp, &url).await;
        }

        tracing::info!("Access token rejected, refreshing...");
        let Some(token) = self.tokens.refresh_access_token().await else {
            bail!("Session expired. Run 'qbank-cli login'.");
        };

        let resp = self.send_get(&url, &token).await?;
        check_response(resp, &url).await
    }

    /// Fetch the user behind the cached session.
    pub async fn current_user(&self) -> Result<User> {
        let resp = self.get("/auth/me").await?;
        resp.json().await.context("Failed to parse /auth/me response")
    }

    async fn send_get(&self, url: &str, token: &str) -> Result<reqwest::Response> {
        tracing::debug!("GET {}", url);
        self.http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))
    }
}

/// Check HTTP response status code and return a clear error on failure.
async fn check_response(resp: reqwest::Response, url: &str) -> Result<reqwest::Response> {
    let status = resp.status();
    if status == reqwest::StatusCode::UNAUTHORIZED {
        bail!(
            "401 Unauthorized for {}. Session may be invalid -- run 'qbank-cli login'.",
            url
        );
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        bail!("HTTP {} for {}: {}", status.as_u16(), url, body);
    }
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::storage::MemoryStore;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn user_body() -> serde_json::Value {
        json!({ "id": "u1", "email": "ada@example.com", "name": "Ada", "role": "admin" })
    }

    #[tokio::test]
    async fn test_not_logged_in_is_error() {
        let tokens = TokenCache::new(MemoryStore::new(), "http://localhost");
        let client = ApiClient::new("http://localhost", &tokens);

        let err = client.current_user().await.unwrap_err();
        assert!(err.to_string().contains("Not logged in"));
    }

    #[tokio::test]
    async fn test_current_user_with_valid_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .and(header("authorization", "Bearer a1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = TokenCache::new(MemoryStore::new(), &server.uri());
        tokens.set_tokens("a1", "r1").unwrap();
        let client = ApiClient::new(&server.uri(), &tokens);

        let me = client.current_user().await.unwrap();
        assert_eq!(me.email, "ada@example.com");
        assert_eq!(me.role, Some(Role::Admin));
    }

    #[tokio::test]
    async fn test_rejected_token_refreshes_and_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .and(header("authorization", "Bearer stale"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .and(body_json(json!({ "refreshToken": "r1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "fresh" })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .and(header("authorization", "Bearer fresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = TokenCache::new(MemoryStore::new(), &server.uri());
        tokens.set_tokens("stale", "r1").unwrap();
        let client = ApiClient::new(&server.uri(), &tokens);

        let me = client.current_user().await.unwrap();
        assert_eq!(me.id, "u1");
        assert_eq!(tokens.get_access_token().as_deref(), Some("fresh"));
        assert_eq!(tokens.get_refresh_token().as_deref(), Some("r1"));
    }

    #[tokio::test]
    async fn test_failed_refresh_ends_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = TokenCache::new(MemoryStore::new(), &server.uri());
        tokens.set_tokens("stale", "r1").unwrap();
        let client = ApiClient::new(&server.uri(), &tokens);

        let err = client.current_user().await.unwrap_err();
        assert!(err.to_string().contains("Session expired"));
        assert!(tokens.store().is_empty());
    }

    #[tokio::test]
    async fn test_server_error_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let tokens = TokenCache::new(MemoryStore::new(), &server.uri());
        tokens.set_tokens("a1", "r1").unwrap();
        let client = ApiClient::new(&server.uri(), &tokens);

        let err = client.get("/auth/me").await.unwrap_err();
        assert!(err.to_string().contains("HTTP 500"));
        // Non-auth failures leave the session alone.
        assert_eq!(tokens.get_access_token().as_deref(), Some("a1"));
    }
}
