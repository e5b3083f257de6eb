use bridge_traits::AuthorizeResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a Drive session.
///
/// ```text
/// Uninitialized -> LoadingSdk -> SdkLoaded -> Authenticating -> Ready
///                                                            \-> Unauthorized
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    Uninitialized,
    LoadingSdk,
    SdkLoaded,
    Authenticating,
    Unauthorized,
    Ready,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::LoadingSdk => "loading_sdk",
            SessionState::SdkLoaded => "sdk_loaded",
            SessionState::Authenticating => "authenticating",
            SessionState::Unauthorized => "unauthorized",
            SessionState::Ready => "ready",
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Uninitialized
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client settings from the remote settings document.
///
/// # Security
///
/// `client_secret` is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub client_id: String,
    /// Space-separated OAuth scopes, passed through verbatim
    pub scopes: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("client_id", &self.client_id)
            .field("scopes", &self.scopes)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

/// A successful authorization, shared by every caller of the attempt that
/// produced it.
#[derive(Clone, PartialEq, Eq)]
pub struct Authorization {
    pub access_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Authorization {
    /// Whether the authorization is expired at `now`, or will be within `buffer_seconds`.
    pub fn expires_within(&self, now: DateTime<Utc>, buffer_seconds: i64) -> bool {
        bridge_traits::expires_within(self.expires_at, now, buffer_seconds)
    }
}

impl From<AuthorizeResult> for Authorization {
    fn from(result: AuthorizeResult) -> Self {
        Self {
            access_token: result.access_token,
            expires_at: result.expires_at,
        }
    }
}

impl fmt::Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authorization")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
