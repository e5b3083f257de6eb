//! Network Monitoring Abstraction
//!
//! Provides network connectivity status so the core can refuse to start
//! work that needs the network while the host is offline.

use async_trait::async_trait;

use crate::error::Result;

/// Network connection status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStatus {
    /// Connected to network
    Connected,
    /// Not connected to any network
    Disconnected,
    /// Connection status unknown or indeterminate
    Indeterminate,
}

/// Network monitor trait
///
/// # Platform Support
///
/// - **Desktop**: TCP reachability probe
/// - **Web**: `navigator.onLine`
///
/// # Example
///
/// ```ignore
/// use bridge_traits::network::NetworkMonitor;
///
/// async fn can_load(monitor: &dyn NetworkMonitor) -> bool {
///     monitor.is_connected().await
/// }
/// ```
#[async_trait]
pub trait NetworkMonitor: Send + Sync {
    /// Get current network status
    async fn status(&self) -> Result<NetworkStatus>;

    /// Check if currently connected to any network
    ///
    /// Only a definite `Disconnected` counts as offline; an indeterminate
    /// status lets the caller try the network and fail there instead.
    async fn is_connected(&self) -> bool {
        !matches!(self.status().await, Ok(NetworkStatus::Disconnected))
    }
}
