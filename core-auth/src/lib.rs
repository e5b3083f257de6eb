//! # Authentication Module
//!
//! SDK bootstrap, session authorization and authorization-code redemption
//! for the Drive client.
//!
//! ## Overview
//!
//! - [`SdkLoader`](loader::SdkLoader) fetches settings and injects the SDK once
//! - [`Authorizer`](authorizer::Authorizer) deduplicates silent authorization
//! - [`OAuthClient`](oauth::OAuthClient) builds consent URLs and redeems codes
//! - [`StateTracker`](state::StateTracker) announces session state changes
//!
//! Loads and authorizations are shared futures: concurrent callers await
//! one underlying operation and observe the same outcome.

pub mod authorizer;
pub mod error;
pub mod loader;
pub mod oauth;
pub mod params;
pub mod state;
pub mod types;

pub use authorizer::Authorizer;
pub use error::{AuthError, Result};
pub use loader::{SdkLoad, SdkLoader};
pub use oauth::OAuthClient;
pub use params::query_parameters;
pub use state::{StateCallback, StateTracker};
pub use types::{Authorization, SessionState, Settings};
