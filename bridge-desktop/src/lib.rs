//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop hosts
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest`
//! - `NetworkMonitor` using a TCP reachability probe
//! - `HostPage` as a headless page that records injections and navigations
//! - `DriveSdk` as an in-process token holder
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{HeadlessPage, NativeSdk, ReqwestHttpClient};
//! use std::sync::Arc;
//!
//! let http = Arc::new(ReqwestHttpClient::new()?);
//! let page = Arc::new(HeadlessPage::new("http://localhost:8080/"));
//! let sdk = Arc::new(NativeSdk::new());
//! ```

mod http;
mod network;
mod page;
mod sdk;

pub use http::ReqwestHttpClient;
pub use network::DesktopNetworkMonitor;
pub use page::HeadlessPage;
pub use sdk::NativeSdk;
