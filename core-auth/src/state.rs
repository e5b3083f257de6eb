//! Session state tracking with synchronous change notification.

use crate::types::SessionState;
use std::sync::{Arc, Mutex, RwLock};
use tracing::debug;

pub type StateCallback = Arc<dyn Fn(SessionState) + Send + Sync>;

/// Current [`SessionState`] plus the callbacks observing it.
///
/// Callbacks run on the thread performing the transition, in registration
/// order, after every lock has been released. A callback may therefore read
/// the state or register further callbacks without deadlocking.
#[derive(Default)]
pub struct StateTracker {
    state: RwLock<SessionState>,
    callbacks: Mutex<Vec<StateCallback>>,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> SessionState {
        self.state
            .read()
            .map(|guard| *guard)
            .unwrap_or_else(|poisoned| *poisoned.into_inner())
    }

    pub fn on_change<F>(&self, callback: F)
    where
        F: Fn(SessionState) + Send + Sync + 'static,
    {
        let mut callbacks = self
            .callbacks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        callbacks.push(Arc::new(callback));
    }

    /// Move to `next`, notifying callbacks if the state actually changed.
    ///
    /// Returns whether a transition happened.
    pub fn transition(&self, next: SessionState) -> bool {
        let previous = {
            let mut state = self
                .state
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if *state == next {
                return false;
            }
            std::mem::replace(&mut *state, next)
        };

        debug!(from = %previous, to = %next, "Session state changed");

        let callbacks: Vec<StateCallback> = self
            .callbacks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();

        for callback in callbacks {
            callback(next);
        }

        true
    }
}
