//! # Host Bridge Traits
//!
//! Capabilities the Drive client needs from its host, expressed as traits.
//!
//! ## Overview
//!
//! The client never talks to a browser, a socket or a clock directly. Each
//! collaborator is a trait the host implements, so the same session logic
//! runs inside a web page, on the desktop, or against test fakes.
//!
//! ## Traits
//!
//! ### Networking
//! - [`HttpClient`](http::HttpClient) - Single-attempt async HTTP
//! - [`NetworkMonitor`](network::NetworkMonitor) - Online/offline detection
//!
//! ### Host integration
//! - [`HostPage`](page::HostPage) - Location, script injection, navigation
//! - [`DriveSdk`](sdk::DriveSdk) - The provider SDK's auth state and silent authorization
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Platform
//! implementations should convert platform-specific errors to `BridgeError`
//! and include context (URL, element id) in the message.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so one session can be shared
//! across async tasks.

pub mod error;
pub mod http;
pub mod network;
pub mod page;
pub mod sdk;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use network::{NetworkMonitor, NetworkStatus};
pub use page::{HostPage, ScriptTag};
pub use sdk::{AccessToken, AuthorizeRequest, AuthorizeResult, DriveSdk};
pub use time::{expires_within, Clock, LogEntry, LogLevel, LoggerSink, SystemClock};
