//! # Client Configuration
//!
//! Holds every host bridge and tunable the Drive session needs.
//!
//! ## Overview
//!
//! The configuration uses a builder to construct a [`ClientConfig`]. It is
//! validated fail-fast: missing bridges are reported with actionable
//! messages before a session is ever created.
//!
//! ## Required Dependencies
//!
//! - `HostPage` - Script injection, current location, navigation
//! - `DriveSdk` - The provider SDK's auth primitives
//!
//! ## Optional Dependencies (with platform defaults)
//!
//! - `HttpClient` - HTTP operations (desktop default: reqwest)
//! - `NetworkMonitor` - Connectivity detection (desktop default: TCP probe)
//! - `Clock` - Time source (default: system clock)
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::ClientConfig;
//! use std::sync::Arc;
//!
//! let config = ClientConfig::builder()
//!     .page(Arc::new(my_page))
//!     .sdk(Arc::new(my_sdk))
//!     .request_timeout(Duration::from_secs(15))
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use bridge_traits::{Clock, DriveSdk, HostPage, HttpClient, NetworkMonitor, SystemClock};
use std::sync::Arc;
use std::time::Duration;

/// Remote locations the client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Settings document, resolved against the page location when relative
    pub settings_url: String,
    /// OAuth consent page
    pub auth_url: String,
    /// OAuth token endpoint
    pub token_url: String,
    /// Drive v2 API base, without trailing slash
    pub api_base: String,
    /// Element id of the injected SDK script
    pub sdk_script_id: String,
    /// Source URL of the SDK script
    pub sdk_script_src: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            settings_url: "settings.json".to_string(),
            auth_url: "https://accounts.google.com/o/oauth2/auth".to_string(),
            token_url: "https://www.googleapis.com/oauth2/v3/token".to_string(),
            api_base: "https://www.googleapis.com/drive/v2".to_string(),
            sdk_script_id: "google-sdk".to_string(),
            sdk_script_src: "https://apis.google.com/js/client.js?onload=handleClientLoad"
                .to_string(),
        }
    }
}

impl Endpoints {
    fn validate(&self) -> Result<()> {
        let fields = [
            ("settings_url", &self.settings_url),
            ("auth_url", &self.auth_url),
            ("token_url", &self.token_url),
            ("api_base", &self.api_base),
            ("sdk_script_id", &self.sdk_script_id),
            ("sdk_script_src", &self.sdk_script_src),
        ];

        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("Endpoint '{}' cannot be empty", name)));
            }
        }

        if self.api_base.ends_with('/') {
            return Err(Error::Config(
                "Endpoint 'api_base' must not end with '/'".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration for a Drive session.
///
/// Use [`ClientConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct ClientConfig {
    pub http_client: Arc<dyn HttpClient>,
    pub network_monitor: Arc<dyn NetworkMonitor>,
    pub page: Arc<dyn HostPage>,
    pub sdk: Arc<dyn DriveSdk>,
    pub clock: Arc<dyn Clock>,
    pub endpoints: Endpoints,
    /// Applied to every HTTP request the client issues
    pub request_timeout: Duration,
    /// Upper bound on settings fetch plus SDK initialization
    pub sdk_load_timeout: Duration,
    /// Upper bound on a single SDK authorize call
    pub auth_timeout: Duration,
    /// Cached authorizations expiring within this window are renewed
    pub token_expiry_buffer: Duration,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("http_client", &"HttpClient { ... }")
            .field("network_monitor", &"NetworkMonitor { ... }")
            .field("page", &"HostPage { ... }")
            .field("sdk", &"DriveSdk { ... }")
            .field("endpoints", &self.endpoints)
            .field("request_timeout", &self.request_timeout)
            .field("sdk_load_timeout", &self.sdk_load_timeout)
            .field("auth_timeout", &self.auth_timeout)
            .field("token_expiry_buffer", &self.token_expiry_buffer)
            .finish()
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Validates timeouts and endpoints.
    pub fn validate(&self) -> Result<()> {
        let timeouts = [
            ("request_timeout", self.request_timeout),
            ("sdk_load_timeout", self.sdk_load_timeout),
            ("auth_timeout", self.auth_timeout),
        ];
        for (name, value) in timeouts {
            if value.is_zero() {
                return Err(Error::Config(format!(
                    "{} must be greater than zero",
                    name
                )));
            }
        }

        if self.token_expiry_buffer > Duration::from_secs(3600) {
            return Err(Error::Config(
                "token_expiry_buffer exceeds maximum of one hour".to_string(),
            ));
        }

        self.endpoints.validate()
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::with_timeout(timeout)
        .map_err(|e| Error::Internal(format!("Failed to create default HttpClient: {}", e)))?;
    Ok(Arc::new(client))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    Err(Error::capability_missing(
        "HttpClient",
        "HttpClient implementation is required for settings, token and Drive requests. \
         Desktop: enable the 'desktop-shims' feature to use the default ReqwestHttpClient. \
         Web: inject a fetch-based client.",
    ))
}

#[cfg(feature = "desktop-shims")]
fn provide_default_network_monitor() -> Result<Arc<dyn NetworkMonitor>> {
    use bridge_desktop::DesktopNetworkMonitor;

    Ok(Arc::new(DesktopNetworkMonitor::new()))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_network_monitor() -> Result<Arc<dyn NetworkMonitor>> {
    Err(Error::capability_missing(
        "NetworkMonitor",
        "NetworkMonitor implementation is required to detect offline hosts before loading the SDK. \
         Desktop: enable the 'desktop-shims' feature to use the default DesktopNetworkMonitor. \
         Web: inject a navigator.onLine-based monitor.",
    ))
}

/// Builder for [`ClientConfig`].
#[derive(Default)]
pub struct ClientConfigBuilder {
    http_client: Option<Arc<dyn HttpClient>>,
    network_monitor: Option<Arc<dyn NetworkMonitor>>,
    page: Option<Arc<dyn HostPage>>,
    sdk: Option<Arc<dyn DriveSdk>>,
    clock: Option<Arc<dyn Clock>>,
    endpoints: Option<Endpoints>,
    request_timeout: Option<Duration>,
    sdk_load_timeout: Option<Duration>,
    auth_timeout: Option<Duration>,
    token_expiry_buffer: Option<Duration>,
}

impl ClientConfigBuilder {
    /// Sets the HTTP client implementation.
    ///
    /// If not provided, the desktop default (reqwest-based) will be used when
    /// the `desktop-shims` feature is enabled.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the network monitor implementation.
    ///
    /// If not provided, the desktop TCP probe is used when the
    /// `desktop-shims` feature is enabled.
    pub fn network_monitor(mut self, monitor: Arc<dyn NetworkMonitor>) -> Self {
        self.network_monitor = Some(monitor);
        self
    }

    /// Sets the host page (required).
    pub fn page(mut self, page: Arc<dyn HostPage>) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the Drive SDK bridge (required).
    pub fn sdk(mut self, sdk: Arc<dyn DriveSdk>) -> Self {
        self.sdk = Some(sdk);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    /// Default: 30 seconds
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Default: 60 seconds
    pub fn sdk_load_timeout(mut self, timeout: Duration) -> Self {
        self.sdk_load_timeout = Some(timeout);
        self
    }

    /// Default: 30 seconds
    pub fn auth_timeout(mut self, timeout: Duration) -> Self {
        self.auth_timeout = Some(timeout);
        self
    }

    /// Default: 60 seconds
    pub fn token_expiry_buffer(mut self, buffer: Duration) -> Self {
        self.token_expiry_buffer = Some(buffer);
        self
    }

    /// Builds the final `ClientConfig`.
    ///
    /// # Errors
    ///
    /// - `CapabilityMissing` when `page` or `sdk` is absent, or when an
    ///   optional bridge is absent and no desktop default is compiled in
    /// - `Config` when a timeout is zero or an endpoint is malformed
    pub fn build(self) -> Result<ClientConfig> {
        let page = self.page.ok_or_else(|| {
            Error::capability_missing(
                "HostPage",
                "HostPage implementation is required for SDK injection and sign-in navigation. \
                 Use .page() to set it.",
            )
        })?;

        let sdk = self.sdk.ok_or_else(|| {
            Error::capability_missing(
                "DriveSdk",
                "DriveSdk implementation is required for authorization. Use .sdk() to set it.",
            )
        })?;

        let request_timeout = self.request_timeout.unwrap_or(Duration::from_secs(30));

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(request_timeout)?,
        };

        let network_monitor = match self.network_monitor {
            Some(monitor) => monitor,
            None => provide_default_network_monitor()?,
        };

        let config = ClientConfig {
            http_client,
            network_monitor,
            page,
            sdk,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            endpoints: self.endpoints.unwrap_or_default(),
            request_timeout,
            sdk_load_timeout: self.sdk_load_timeout.unwrap_or(Duration::from_secs(60)),
            auth_timeout: self.auth_timeout.unwrap_or(Duration::from_secs(30)),
            token_expiry_buffer: self.token_expiry_buffer.unwrap_or(Duration::from_secs(60)),
        };

        config.validate()?;

        Ok(config)
    }
}
