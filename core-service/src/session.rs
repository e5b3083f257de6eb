//! # Drive Session
//!
//! The session object host code talks to. It owns one SDK loader, one
//! authorizer and one state tracker, and routes every network operation
//! through the shared authorization.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized -> LoadingSdk -> SdkLoaded -> Authenticating -> Ready
//!                                                           \-> Unauthorized
//! ```
//!
//! ## Example
//!
//! ```ignore
//! let session = DriveSession::new(config);
//! session.on_state_change(|state| println!("session is {}", state));
//!
//! // Host calls `session.did_load_sdk()` from the SDK's onload hook.
//! session.check_authentication().await?;
//!
//! for rom in session.files().await? {
//!     let bytes = session.download_file(Some(&rom)).await;
//! }
//! ```

use crate::error::{CoreError, Result};
use bridge_traits::{DriveSdk, HostPage};
use bytes::Bytes;
use core_auth::{
    query_parameters, AuthError, Authorization, Authorizer, OAuthClient, SdkLoad, SdkLoader,
    SessionState, Settings, StateTracker,
};
use core_runtime::config::ClientConfig;
use provider_google_drive::{DriveFile, FileDownloader, GoogleDriveConnector};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Query parameter carrying an authorization code after the consent redirect.
const CODE_PARAM: &str = "code";

pub struct DriveSession {
    state: Arc<StateTracker>,
    loader: Arc<SdkLoader>,
    authorizer: Arc<Authorizer>,
    oauth: OAuthClient,
    connector: Arc<GoogleDriveConnector>,
    downloader: FileDownloader,
    page: Arc<dyn HostPage>,
    sdk: Arc<dyn DriveSdk>,
}

impl DriveSession {
    pub fn new(config: ClientConfig) -> Self {
        let state = Arc::new(StateTracker::new());
        let loader = Arc::new(SdkLoader::new(&config, state.clone()));
        let authorizer = Arc::new(Authorizer::new(&config, loader.clone(), state.clone()));
        let connector = Arc::new(GoogleDriveConnector::new(&config, authorizer.clone()));

        Self {
            state,
            loader,
            authorizer,
            oauth: OAuthClient::new(&config),
            downloader: FileDownloader::new(connector.clone()),
            connector,
            page: config.page,
            sdk: config.sdk,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.current()
    }

    /// Register a callback for every state transition.
    ///
    /// Callbacks run synchronously, in registration order.
    pub fn on_state_change<F>(&self, callback: F)
    where
        F: Fn(SessionState) + Send + Sync + 'static,
    {
        self.state.on_change(callback);
    }

    /// Shared SDK load signal; the first call starts the load.
    pub fn load_sdk(&self) -> SdkLoad {
        self.loader.load()
    }

    /// Called by the host once the injected SDK script has initialized.
    pub fn did_load_sdk(&self) {
        self.loader.did_load_sdk();
    }

    /// Settings from a completed SDK load.
    pub fn settings(&self) -> Option<Arc<Settings>> {
        self.loader.settings()
    }

    pub async fn authorize(&self) -> Result<Authorization> {
        Ok(self.authorizer.authorize().await?)
    }

    /// Send the host page to the consent screen.
    ///
    /// Nothing is navigated when the SDK fails to load.
    #[instrument(skip(self))]
    pub async fn sign_in(&self) -> Result<()> {
        let settings = match self.loader.load().await {
            Ok(settings) => settings,
            Err(e) => {
                error!(error = %e, "Failed to sign in");
                return Err(e.into());
            }
        };

        let url = self.oauth.consent_url(&settings)?;
        info!("Navigating to consent page");

        self.page.navigate(&url).map_err(|e| {
            CoreError::Auth(AuthError::AuthorizationFailed(format!(
                "Navigation to consent page failed: {}",
                e
            )))
        })
    }

    /// Query parameters of the current page location, values undecoded.
    pub fn get_parameters(&self) -> HashMap<String, String> {
        query_parameters(&self.page.location())
    }

    /// Redeem `code` and install the resulting token into the SDK.
    #[instrument(skip(self, code))]
    pub async fn redeem_token(&self, code: &str) -> Result<()> {
        let settings = self.loader.load().await?;
        let token = self.oauth.exchange_code(&settings, code).await?;

        self.sdk.set_token(token);
        info!("Installed redeemed token");
        Ok(())
    }

    /// Redeem the `code` left in the URL by a consent redirect, if any.
    pub async fn redeem_outstanding_tokens(&self) -> Result<()> {
        match self.get_parameters().remove(CODE_PARAM) {
            Some(code) => self.redeem_token(&code).await,
            None => Ok(()),
        }
    }

    pub async fn check_authentication(&self) -> Result<Authorization> {
        self.redeem_outstanding_tokens().await?;
        self.authorize().await
    }

    /// Every ROM file in the user's Drive.
    pub async fn files(&self) -> Result<Vec<DriveFile>> {
        Ok(self.connector.files().await?)
    }

    pub async fn file(&self, parent: &str, title: &str) -> Result<DriveFile> {
        Ok(self.connector.file(parent, title).await?)
    }

    pub async fn download_file(&self, file: Option<&DriveFile>) -> Option<Bytes> {
        self.downloader.download(file).await
    }

    pub async fn download_file_base64(&self, file: Option<&DriveFile>) -> Option<String> {
        self.downloader.download_base64(file).await
    }

    /// [`download_file`](Self::download_file) delivering to `callback`.
    pub async fn download_file_with<F>(&self, file: Option<&DriveFile>, callback: F)
    where
        F: FnOnce(Option<Bytes>),
    {
        callback(self.download_file(file).await);
    }

    /// [`download_file_base64`](Self::download_file_base64) delivering to `callback`.
    pub async fn download_file_base64_with<F>(&self, file: Option<&DriveFile>, callback: F)
    where
        F: FnOnce(Option<String>),
    {
        callback(self.download_file_base64(file).await);
    }
}
