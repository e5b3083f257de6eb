//! Error types for the Google Drive provider

use core_auth::AuthError;
use thiserror::Error;

/// Google Drive provider errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GoogleDriveError {
    /// The session could not be authorized
    #[error(transparent)]
    Authorization(#[from] AuthError),

    /// Listing failed: transport error, error status, or malformed page
    #[error("File query failed: {0}")]
    QueryFailed(String),

    /// A single-file lookup matched nothing
    #[error("No file titled '{title}' in {parent}")]
    ResourceNotFound { parent: String, title: String },

    /// Content could not be fetched
    #[error("Download failed: {0}")]
    DownloadFailed(String),
}

/// Result type for Google Drive operations
pub type Result<T> = std::result::Result<T, GoogleDriveError>;
