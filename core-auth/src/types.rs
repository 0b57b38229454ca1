use serde::{Deserialize, Serialize};
use std::fmt;

/// OAuth 2.0 token set.
///
/// Contains the access token, optional refresh token, and expiration time
/// for an authenticated session.
///
/// # Security
///
/// Tokens should be stored securely and never logged. The `Debug`
/// implementation redacts sensitive information.
///
/// # Examples
///
/// ```
/// use core_auth::OAuthTokens;
/// use chrono::{Duration, Utc};
///
/// let tokens = OAuthTokens {
///     access_token: "ya29.a0...".to_string(),
///     refresh_token: Some("1//0g...".to_string()),
///     expires_at: Utc::now() + Duration::hours(1),
/// };
///
/// assert!(!tokens.is_expired_with_buffer(60));
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct OAuthTokens {
    /// The access token used for API requests
    pub access_token: String,
    /// The refresh token used to obtain new access tokens.
    ///
    /// Token endpoints may omit this on refresh responses; callers must
    /// carry the previous refresh token forward in that case.
    pub refresh_token: Option<String>,
    /// When the access token expires (UTC)
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

impl OAuthTokens {
    /// Create a new token set expiring `expires_in` seconds from now
    pub fn new(access_token: String, refresh_token: Option<String>, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at: chrono::Utc::now() + chrono::Duration::seconds(expires_in),
        }
    }

    /// Check if the access token is expired or expires within `buffer_seconds`.
    ///
    /// The buffer ensures tokens are refreshed before they actually expire,
    /// so an in-flight request never carries a token that dies mid-call.
    pub fn is_expired_with_buffer(&self, buffer_seconds: i64) -> bool {
        let now = chrono::Utc::now();
        let buffer = chrono::Duration::seconds(buffer_seconds);
        now >= self.expires_at - buffer
    }

    /// Get the time remaining until token expiration
    ///
    /// Returns `None` if the token is already expired.
    pub fn time_until_expiry(&self) -> Option<chrono::Duration> {
        let now = chrono::Utc::now();
        if now >= self.expires_at {
            None
        } else {
            Some(self.expires_at - now)
        }
    }
}

// Custom Debug implementation to avoid logging tokens
impl fmt::Debug for OAuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthTokens")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
