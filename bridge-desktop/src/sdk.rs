//! In-process Drive SDK
//!
//! Holds the auth state for hosts that have no JavaScript client library.
//! Silent authorization succeeds only while a still-valid token is held.

use async_trait::async_trait;
use bridge_traits::{
    sdk::{AccessToken, AuthorizeRequest, AuthorizeResult, DriveSdk},
    time::{Clock, SystemClock},
};
use std::sync::{Arc, RwLock};
use tracing::debug;

pub struct NativeSdk {
    token: RwLock<Option<AccessToken>>,
    clock: Arc<dyn Clock>,
}

impl NativeSdk {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            token: RwLock::new(None),
            clock,
        }
    }

    /// Drop the held token.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
    }
}

impl Default for NativeSdk {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DriveSdk for NativeSdk {
    async fn authorize(&self, request: AuthorizeRequest) -> Option<AuthorizeResult> {
        debug!(immediate = request.immediate, "Native SDK authorize");

        if !request.immediate {
            return Some(AuthorizeResult::failed("interaction_required"));
        }

        let now = self.clock.now();
        let result = match self.token() {
            Some(token) if !token.expires_within(now, 0) => {
                AuthorizeResult::granted(token.access_token, token.expires_at)
            }
            _ => AuthorizeResult::failed("immediate_failed"),
        };
        Some(result)
    }

    fn set_token(&self, token: AccessToken) {
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token);
        }
    }

    fn token(&self) -> Option<AccessToken> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }
}
