//! # Google Drive Provider
//!
//! ROM discovery and download over the Google Drive API v2.
//!
//! ## Overview
//!
//! This crate provides:
//! - Structured search filters with escaped string literals ([`Filter`])
//! - Paginated listing of every ROM file and single-file lookup by parent and
//!   title ([`GoogleDriveConnector`])
//! - Authenticated downloads as raw bytes or base64 ([`FileDownloader`])
//!
//! All network operations authorize through the session's shared
//! [`Authorizer`](core_auth::Authorizer) before making a request.

pub mod connector;
pub mod download;
pub mod error;
pub mod query;
pub mod types;

#[cfg(test)]
mod test_support;

pub use connector::GoogleDriveConnector;
pub use download::FileDownloader;
pub use error::{GoogleDriveError, Result};
pub use query::Filter;
pub use types::{DriveFile, FilesPage};
