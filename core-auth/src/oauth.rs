//! OAuth 2.0 Authorization-Code Flow
//!
//! Builds the consent URL the host navigates to for an explicit sign-in, and
//! redeems the authorization code the consent page redirects back with.
//!
//! # Security
//!
//! Codes, secrets and tokens are never logged.
//!
//! # Example
//!
//! ```no_run
//! use core_auth::oauth::OAuthClient;
//! # use core_auth::Settings;
//! # use core_runtime::config::ClientConfig;
//!
//! # async fn example(config: &ClientConfig, settings: &Settings) -> core_auth::Result<()> {
//! let client = OAuthClient::new(config);
//! let consent = client.consent_url(settings)?;
//! // Host navigates to `consent`, the user approves, the page reloads with ?code=...
//! let token = client.exchange_code(settings, "4/0Ab...").await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::types::Settings;
use bridge_traits::{AccessToken, Clock, HttpClient, HttpRequest};
use core_runtime::config::ClientConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Fixed `state` value sent with every code redemption.
const REDEEM_STATE: &str = "100000";

pub struct OAuthClient {
    http: Arc<dyn HttpClient>,
    clock: Arc<dyn Clock>,
    auth_url: String,
    token_url: String,
    request_timeout: Duration,
}

/// Form body posted to the token endpoint.
#[derive(Serialize)]
struct RedeemForm<'a> {
    code: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    redirect_uri: &'a str,
    grant_type: &'a str,
    state: &'a str,
}

/// Token response from the OAuth provider.
#[derive(Debug, Deserialize, Serialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_in: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id_token: Option<String>,
}

impl OAuthClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: config.http_client.clone(),
            clock: config.clock.clone(),
            auth_url: config.endpoints.auth_url.clone(),
            token_url: config.endpoints.token_url.clone(),
            request_timeout: config.request_timeout,
        }
    }

    /// Consent page URL for an explicit, interactive sign-in.
    pub fn consent_url(&self, settings: &Settings) -> Result<String> {
        let mut url = Url::parse(&self.auth_url)
            .map_err(|e| AuthError::InvalidUrl(format!("{}: {}", self.auth_url, e)))?;

        url.query_pairs_mut()
            .append_pair("redirect_uri", &settings.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("client_id", &settings.client_id)
            .append_pair("scope", &settings.scopes);

        debug!("Built consent URL");
        Ok(url.to_string())
    }

    /// Exchange an authorization code for an access token.
    ///
    /// # Errors
    ///
    /// `TokenExchangeFailed` on transport failure, a non-2xx status, or an
    /// unreadable response body.
    #[instrument(skip(self, settings, code))]
    pub async fn exchange_code(&self, settings: &Settings, code: &str) -> Result<AccessToken> {
        let form = RedeemForm {
            code,
            client_id: &settings.client_id,
            client_secret: &settings.client_secret,
            redirect_uri: &settings.redirect_uri,
            grant_type: "authorization_code",
            state: REDEEM_STATE,
        };

        let request = HttpRequest::post(self.token_url.as_str())
            .form(&form)
            .map_err(|e| AuthError::TokenExchangeFailed(e.to_string()))?
            .timeout(self.request_timeout);

        debug!("Exchanging authorization code for token");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| AuthError::TokenExchangeFailed(e.to_string()))?;

        if !response.is_success() {
            let status = response.status;
            let error_body = response
                .text()
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            warn!(status, error = %error_body, "Token endpoint rejected authorization code");

            return Err(AuthError::TokenExchangeFailed(format!(
                "Token endpoint returned {}: {}",
                status, error_body
            )));
        }

        let token: TokenResponse = response
            .json()
            .map_err(|e| AuthError::TokenExchangeFailed(e.to_string()))?;

        info!(expires_in = ?token.expires_in, "Redeemed authorization code");

        let expires_at = token
            .expires_in
            .map(|seconds| self.clock.now() + chrono::Duration::seconds(seconds));

        let mut access = AccessToken::new(token.access_token, expires_at);
        if let Some(token_type) = token.token_type {
            access.token_type = token_type;
        }
        access.refresh_token = token.refresh_token;

        Ok(access)
    }
}
