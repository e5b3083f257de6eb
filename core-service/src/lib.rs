//! Core service façade and composition root.
//!
//! This crate wires host-provided bridge implementations (HTTP, network
//! status, host page, provider SDK) into a [`DriveSession`]. Desktop apps
//! typically enable the `desktop-shims` feature, which supplies the reqwest
//! HTTP client and network monitor plus a headless page and a native SDK from
//! `bridge-desktop`.

pub mod error;
pub mod root;
pub mod session;

pub use error::{CoreError, Result};
pub use root::SessionRoot;
pub use session::DriveSession;

pub use core_auth::{Authorization, SessionState, Settings};
pub use provider_google_drive::DriveFile;

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop::{HeadlessPage, NativeSdk};
