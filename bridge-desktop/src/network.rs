//! Network Monitoring Implementation

use async_trait::async_trait;
use bridge_traits::{
    error::Result,
    network::{NetworkMonitor, NetworkStatus},
};
use std::time::Duration;
use tracing::debug;

/// Desktop network monitor implementation
///
/// Reports connectivity by opening a TCP connection to a well-known host.
pub struct DesktopNetworkMonitor {
    probe_addr: String,
    probe_timeout: Duration,
}

impl DesktopNetworkMonitor {
    /// Create a new network monitor probing Google's public DNS
    pub fn new() -> Self {
        Self::with_probe("8.8.8.8:53", Duration::from_secs(5))
    }

    /// Create a monitor probing `addr` (host:port)
    pub fn with_probe(addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            probe_addr: addr.into(),
            probe_timeout: timeout,
        }
    }

    async fn check_connectivity(&self) -> NetworkStatus {
        match tokio::time::timeout(
            self.probe_timeout,
            tokio::net::TcpStream::connect(self.probe_addr.as_str()),
        )
        .await
        {
            Ok(Ok(_)) => NetworkStatus::Connected,
            Ok(Err(_)) => NetworkStatus::Disconnected,
            Err(_) => NetworkStatus::Indeterminate,
        }
    }
}

impl Default for DesktopNetworkMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NetworkMonitor for DesktopNetworkMonitor {
    async fn status(&self) -> Result<NetworkStatus> {
        let status = self.check_connectivity().await;
        debug!(status = ?status, probe = %self.probe_addr, "Network status checked");
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_probe_is_not_connected() {
        // Port 9 on loopback is closed on any sane test machine.
        let monitor = DesktopNetworkMonitor::with_probe("127.0.0.1:9", Duration::from_secs(1));
        let status = monitor.status().await.unwrap();

        assert_ne!(status, NetworkStatus::Connected);
    }

    #[tokio::test]
    async fn test_reachable_probe_is_connected() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let monitor = DesktopNetworkMonitor::with_probe(addr.to_string(), Duration::from_secs(1));

        assert_eq!(monitor.status().await.unwrap(), NetworkStatus::Connected);
        assert!(monitor.is_connected().await);
    }
}
