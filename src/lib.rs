//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates. Host applications can depend on `drive-rom-workspace` and
//! enable `desktop-shims` to get the session façade wired with the reqwest
//! HTTP client and the desktop network monitor, without listing each crate.

#[cfg(feature = "desktop-shims")]
pub use core_service::{DriveSession, SessionRoot};
