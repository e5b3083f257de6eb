use thiserror::Error;

/// Failures of the SDK bootstrap, authorization and token redemption.
///
/// Cloneable because one outcome is observed by every caller sharing a load
/// or an authorization attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Network unavailable")]
    NetworkUnavailable,

    #[error("Failed to fetch settings: {0}")]
    SettingsFetchFailed(String),

    #[error("SDK failed to load: {0}")]
    SdkLoadFailed(String),

    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),

    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("Timed out during {operation}")]
    Timeout { operation: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
