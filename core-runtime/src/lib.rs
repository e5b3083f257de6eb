//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the Drive client:
//! - Logging and tracing bootstrap
//! - Client configuration and bridge wiring
//!
//! ## Overview
//!
//! Every other workspace crate depends on this one for its logging
//! conventions and for the validated [`ClientConfig`](config::ClientConfig)
//! that carries host bridges into a session.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{ClientConfig, ClientConfigBuilder, Endpoints};
pub use error::{Error, Result};
