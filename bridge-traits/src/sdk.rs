//! Storage SDK Abstraction
//!
//! The provider's client library owns the auth state: it performs silent
//! ("immediate") authorization, accepts tokens redeemed elsewhere, and hands
//! out the current access token for authenticated requests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parameters for an authorization attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizeRequest {
    pub client_id: String,
    pub scopes: String,
    /// Silent attempt that never interacts with the user
    pub immediate: bool,
}

/// What the SDK reports back from an authorization attempt.
///
/// A result carrying `error` is a failed attempt even when other fields are
/// populated.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthorizeResult {
    pub access_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl AuthorizeResult {
    pub fn granted(access_token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            expires_at,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            access_token: None,
            expires_at: None,
            error: Some(error.into()),
        }
    }
}

impl fmt::Debug for AuthorizeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizeResult")
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("expires_at", &self.expires_at)
            .field("error", &self.error)
            .finish()
    }
}

/// Access token held in the SDK's auth state.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl AccessToken {
    pub fn new(access_token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: default_token_type(),
            expires_at,
            refresh_token: None,
        }
    }

    /// Whether the token is expired at `now`, or will be within `buffer_seconds`.
    ///
    /// Tokens without a known expiry never report as expired.
    pub fn expires_within(&self, now: DateTime<Utc>, buffer_seconds: i64) -> bool {
        crate::time::expires_within(self.expires_at, now, buffer_seconds)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Storage SDK trait
///
/// # Platform Support
///
/// - **Web**: `gapi.auth.authorize`, `gapi.auth.setToken`, `gapi.auth.getToken`
/// - **Desktop**: an in-process token holder
#[async_trait]
pub trait DriveSdk: Send + Sync {
    /// Run an authorization attempt.
    ///
    /// `None` means the SDK produced no result at all.
    async fn authorize(&self, request: AuthorizeRequest) -> Option<AuthorizeResult>;

    /// Install a token obtained outside the SDK
    fn set_token(&self, token: AccessToken);

    /// The token currently held in the auth state
    fn token(&self) -> Option<AccessToken>;
}
