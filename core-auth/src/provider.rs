//! # Credential Providers
//!
//! Supplies valid destination access tokens to the service connectors.
//!
//! ## Overview
//!
//! Connectors never see refresh tokens or the token endpoint; they ask a
//! [`CredentialProvider`] for an access token before every call and get one
//! that is guaranteed to outlive the request. Two implementations exist:
//!
//! - [`RefreshingCredentialProvider`]: holds an [`OAuthTokens`] set, refreshes
//!   it against the OAuth token endpoint when fewer than 60 seconds of
//!   validity remain, and persists refreshed tokens back to a JSON file so a
//!   later run starts from the newest token.
//! - [`StaticCredentialProvider`]: returns a fixed token. Useful for tests
//!   and pre-issued short-lived tokens.
//!
//! The interactive flow that mints the initial token set is out of scope;
//! this module only keeps an existing grant alive.

use crate::error::{AuthError, Result};
use crate::types::OAuthTokens;
use async_trait::async_trait;
use migrate_traits::http::{HttpClient, HttpMethod, HttpRequest};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Seconds of remaining validity below which a token is refreshed
const TOKEN_REFRESH_MARGIN: i64 = 60;

/// Supplies a valid access token for destination API calls.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Return an access token valid for at least the refresh margin.
    async fn access_token(&self) -> Result<String>;
}

/// Credential provider returning a fixed, pre-issued token.
pub struct StaticCredentialProvider {
    token: String,
}

impl StaticCredentialProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

/// Token endpoint response for a refresh_token grant
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    refresh_token: Option<String>,
}

/// Credential provider that refreshes an OAuth 2.0 grant on demand.
///
/// Refresh happens under a lock, so concurrent callers never trigger two
/// refreshes for the same grant. Refreshed tokens are written back to the
/// token file; when the token endpoint omits the refresh token in its
/// response, the previous one is carried forward.
pub struct RefreshingCredentialProvider {
    http_client: Arc<dyn HttpClient>,
    token_url: String,
    client_id: String,
    client_secret: String,
    /// Where refreshed tokens are persisted between runs
    token_path: PathBuf,
    tokens: Mutex<OAuthTokens>,
}

impl RefreshingCredentialProvider {
    /// Create a provider from an already-loaded token set
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        token_path: impl Into<PathBuf>,
        tokens: OAuthTokens,
    ) -> Self {
        Self {
            http_client,
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_path: token_path.into(),
            tokens: Mutex::new(tokens),
        }
    }

    /// Create a provider by reading the token set from `token_path`
    pub async fn load(
        http_client: Arc<dyn HttpClient>,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        token_path: impl Into<PathBuf>,
    ) -> Result<Self> {
        let token_path = token_path.into();
        let raw = tokio::fs::read_to_string(&token_path).await?;
        let tokens: OAuthTokens = serde_json::from_str(&raw)
            .map_err(|e| AuthError::TokenFile(format!("Failed to parse token file: {}", e)))?;

        Ok(Self::new(
            http_client,
            token_url,
            client_id,
            client_secret,
            token_path,
            tokens,
        ))
    }

    /// Exchange the refresh token for a new token set
    async fn refresh(&self, current: &OAuthTokens) -> Result<OAuthTokens> {
        let refresh_token = current
            .refresh_token
            .as_deref()
            .ok_or(AuthError::NoRefreshToken)?;

        let body = format!(
            "grant_type=refresh_token&refresh_token={}&client_id={}&client_secret={}",
            urlencoding::encode(refresh_token),
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.client_secret)
        );

        let request = HttpRequest::new(HttpMethod::Post, &self.token_url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body.into_bytes().into());

        let response = self.http_client.execute(request).await?;

        if !response.is_success() {
            return Err(AuthError::TokenRefreshFailed(format!(
                "Token endpoint returned status {}",
                response.status
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .map_err(|e| AuthError::TokenRefreshFailed(format!("Malformed response: {}", e)))?;

        // Endpoints only return a refresh token on the initial grant;
        // keep the old one when the response omits it.
        let refresh_token = token_response
            .refresh_token
            .or_else(|| current.refresh_token.clone());

        Ok(OAuthTokens::new(
            token_response.access_token,
            refresh_token,
            token_response.expires_in,
        ))
    }

    /// Persist the token set so the next run starts from the newest grant
    async fn persist(&self, tokens: &OAuthTokens) -> Result<()> {
        let json = serde_json::to_vec_pretty(tokens)
            .map_err(|e| AuthError::TokenFile(format!("Failed to serialize tokens: {}", e)))?;
        tokio::fs::write(&self.token_path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl CredentialProvider for RefreshingCredentialProvider {
    #[instrument(skip(self))]
    async fn access_token(&self) -> Result<String> {
        let mut tokens = self.tokens.lock().await;

        if !tokens.is_expired_with_buffer(TOKEN_REFRESH_MARGIN) {
            debug!("Token is valid, no refresh needed");
            return Ok(tokens.access_token.clone());
        }

        info!("Token expired or expiring soon, refreshing");
        let refreshed = self.refresh(&tokens).await?;

        if let Err(e) = self.persist(&refreshed).await {
            // The refreshed token is still usable this run; only resume
            // from a cold start would see the stale file.
            warn!(error = %e, "Failed to persist refreshed tokens");
        }

        *tokens = refreshed;
        info!("Token refreshed successfully");
        Ok(tokens.access_token.clone())
    }
}
