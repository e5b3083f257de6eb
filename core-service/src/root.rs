//! Composition root holding the application's one session.

use crate::error::{CoreError, Result};
use crate::session::DriveSession;
use core_runtime::config::ClientConfig;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Lazily created, shared [`DriveSession`].
///
/// Create one at application startup and hand the session it yields to
/// whatever needs it.
#[derive(Default)]
pub struct SessionRoot {
    session: Mutex<Option<Arc<DriveSession>>>,
}

impl SessionRoot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the session, building it from `configure` on first use.
    ///
    /// `configure` runs at most once successfully; a failed build leaves the
    /// root empty so a later call can try again. A rejected configuration is
    /// reported as `InitializationFailed`, a missing bridge as
    /// `CapabilityMissing`.
    pub fn get_or_create<F>(&self, configure: F) -> Result<Arc<DriveSession>>
    where
        F: FnOnce() -> core_runtime::Result<ClientConfig>,
    {
        let mut slot = self
            .session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(session) = slot.as_ref() {
            return Ok(session.clone());
        }

        let config = configure().map_err(|e| match e {
            core_runtime::Error::Config(message) => CoreError::InitializationFailed(message),
            other => CoreError::from(other),
        })?;
        let session = Arc::new(DriveSession::new(config));
        debug!("Created drive session");
        *slot = Some(session.clone());
        Ok(session)
    }

    pub fn get(&self) -> Option<Arc<DriveSession>> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
