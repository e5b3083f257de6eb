//! # SDK Loader
//!
//! Fetches the client settings and brings up the provider SDK exactly once
//! per session.
//!
//! ## Overview
//!
//! [`SdkLoader::load`] hands out a shared future. The first call moves the
//! session to `LoadingSdk` and creates the future; every later call clones
//! it, so concurrent callers trigger a single settings fetch and a single
//! script injection and all observe the same outcome. A failed load stays
//! failed for the lifetime of the loader.
//!
//! The SDK announces readiness out of band: the host calls
//! [`SdkLoader::did_load_sdk`] once the injected script has initialized.

use crate::error::{AuthError, Result};
use crate::state::StateTracker;
use crate::types::{SessionState, Settings};
use bridge_traits::{HostPage, HttpClient, HttpRequest, NetworkMonitor, ScriptTag};
use core_runtime::config::{ClientConfig, Endpoints};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Shared handle to the one SDK load of a session.
pub type SdkLoad = Shared<BoxFuture<'static, Result<Arc<Settings>>>>;

pub struct SdkLoader {
    task: LoadTask,
    load: Mutex<Option<SdkLoad>>,
    ready: Mutex<Option<oneshot::Sender<()>>>,
}

/// Everything the load future needs, owned so it can outlive the call.
#[derive(Clone)]
struct LoadTask {
    http: Arc<dyn HttpClient>,
    network: Arc<dyn NetworkMonitor>,
    page: Arc<dyn HostPage>,
    state: Arc<StateTracker>,
    endpoints: Endpoints,
    request_timeout: Duration,
    load_timeout: Duration,
}

impl SdkLoader {
    pub fn new(config: &ClientConfig, state: Arc<StateTracker>) -> Self {
        Self {
            task: LoadTask {
                http: config.http_client.clone(),
                network: config.network_monitor.clone(),
                page: config.page.clone(),
                state,
                endpoints: config.endpoints.clone(),
                request_timeout: config.request_timeout,
                load_timeout: config.sdk_load_timeout,
            },
            load: Mutex::new(None),
            ready: Mutex::new(None),
        }
    }

    /// Start the load on first call; afterwards return the same signal.
    ///
    /// The `LoadingSdk` transition is announced after the slot lock is
    /// released, so state callbacks may call back into the loader.
    pub fn load(&self) -> SdkLoad {
        let future = {
            let mut slot = self
                .load
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());

            if let Some(existing) = slot.as_ref() {
                return existing.clone();
            }

            let (ready_tx, ready_rx) = oneshot::channel();
            *self
                .ready
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(ready_tx);

            let future = self.task.clone().run(ready_rx).boxed().shared();
            *slot = Some(future.clone());
            future
        };

        self.task.state.transition(SessionState::LoadingSdk);
        future
    }

    /// Signal from the host that the injected SDK finished initializing.
    pub fn did_load_sdk(&self) {
        let sender = self
            .ready
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        match sender {
            Some(sender) => {
                info!("Drive SDK loaded");
                // The receiver is gone only if the load already failed.
                let _ = sender.send(());
            }
            None => warn!("did_load_sdk called with no SDK load in progress"),
        }
    }

    /// Settings from a completed, successful load.
    pub fn settings(&self) -> Option<Arc<Settings>> {
        self.load
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .and_then(|load| load.peek().cloned())
            .and_then(|outcome| outcome.ok())
    }
}

impl LoadTask {
    async fn run(self, ready: oneshot::Receiver<()>) -> Result<Arc<Settings>> {
        let outcome = tokio::time::timeout(self.load_timeout, self.load_sdk(ready))
            .await
            .unwrap_or_else(|_| {
                Err(AuthError::SdkLoadFailed(format!(
                    "SDK did not load within {}s",
                    self.load_timeout.as_secs()
                )))
            });

        if let Err(error) = &outcome {
            warn!(error = %error, "SDK load failed");
        }

        outcome
    }

    #[instrument(skip(self, ready))]
    async fn load_sdk(&self, ready: oneshot::Receiver<()>) -> Result<Arc<Settings>> {
        if !self.network.is_connected().await {
            return Err(AuthError::NetworkUnavailable);
        }

        let settings = self.fetch_settings().await?;

        let script_id = &self.endpoints.sdk_script_id;
        if self.page.has_element(script_id) {
            debug!(id = %script_id, "SDK script already present, skipping injection");
        } else {
            info!("Loading Drive SDK");
            let tag = ScriptTag::new(script_id.clone(), self.endpoints.sdk_script_src.clone());
            self.page
                .inject_script(tag)
                .map_err(|e| AuthError::SdkLoadFailed(e.to_string()))?;
        }

        ready.await.map_err(|_| {
            AuthError::SdkLoadFailed("SDK readiness signal was dropped".to_string())
        })?;

        self.state.transition(SessionState::SdkLoaded);
        Ok(Arc::new(settings))
    }

    async fn fetch_settings(&self) -> Result<Settings> {
        let url = resolve_against(&self.page.location(), &self.endpoints.settings_url)?;
        info!(url = %url, "Loading settings");

        let request = HttpRequest::get(url.as_str()).timeout(self.request_timeout);
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| AuthError::SettingsFetchFailed(e.to_string()))?;

        if !response.is_success() {
            return Err(AuthError::SettingsFetchFailed(format!(
                "Settings endpoint returned {}",
                response.status
            )));
        }

        let settings: Settings = response
            .json()
            .map_err(|e| AuthError::SettingsFetchFailed(e.to_string()))?;

        info!(client_id = %settings.client_id, "Successfully loaded settings");
        Ok(settings)
    }
}

/// Resolve `target` the way a browser resolves a relative link on `location`.
fn resolve_against(location: &str, target: &str) -> Result<Url> {
    match Url::parse(location) {
        Ok(base) => base
            .join(target)
            .map_err(|e| AuthError::InvalidUrl(format!("{}: {}", target, e))),
        Err(_) => {
            Url::parse(target).map_err(|e| AuthError::InvalidUrl(format!("{}: {}", target, e)))
        }
    }
}
