//! Theme preference state.
//!
//! SYSTEM CONTEXT
//! ==============
//! The settings screen and navbar toggle write the preference; every screen
//! reads the resolved light/dark value. Resolution against the OS color
//! scheme is done by the session bootstrap, which calls
//! [`ThemeStore::set_resolved_theme`].
//!
//! TRADE-OFFS
//! ==========
//! Persisting the preference is best-effort: a storage failure is logged and
//! the in-memory preference still changes, so the toggle never fails in
//! front of the user.

#[cfg(test)]
#[path = "theme_test.rs"]
mod tests;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::storage::{DurableStorage, THEME_KEY};
use crate::types::{ResolvedTheme, ThemePreference};

/// Snapshot of the theme store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ThemeState {
    pub preference: ThemePreference,
    pub resolved: ResolvedTheme,
}

pub struct ThemeStore {
    storage: Arc<dyn DurableStorage>,
    state: watch::Sender<ThemeState>,
}

impl ThemeStore {
    #[must_use]
    pub fn new(storage: Arc<dyn DurableStorage>) -> Self {
        let (state, _) = watch::channel(ThemeState::default());
        Self { storage, state }
    }

    #[must_use]
    pub fn state(&self) -> ThemeState {
        *self.state.borrow()
    }

    #[must_use]
    pub fn preference(&self) -> ThemePreference {
        self.state.borrow().preference
    }

    #[must_use]
    pub fn resolved(&self) -> ResolvedTheme {
        self.state.borrow().resolved
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ThemeState> {
        self.state.subscribe()
    }

    /// Adopt the persisted preference if it is a recognized literal.
    ///
    /// Anything else (missing key, unknown value, unreadable storage) leaves
    /// the current preference untouched.
    pub fn initialize_theme(&self) {
        let stored = match self.storage.get(THEME_KEY) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "failed to read stored theme; keeping default");
                return;
            }
        };
        let Some(raw) = stored else {
            debug!("no stored theme preference");
            return;
        };
        match raw.parse::<ThemePreference>() {
            Ok(preference) => {
                debug!(%preference, "restored theme preference");
                self.state.send_modify(|s| s.preference = preference);
            }
            Err(e) => warn!(error = %e, "ignoring unrecognized stored theme"),
        }
    }

    /// Set and persist the preference.
    pub fn set_theme(&self, preference: ThemePreference) {
        self.state.send_modify(|s| s.preference = preference);
        if let Err(e) = self.storage.set(THEME_KEY, preference.as_str()) {
            warn!(error = %e, %preference, "failed to persist theme preference");
        }
    }

    /// Set the resolved theme. Subscribers are notified only on change.
    pub fn set_resolved_theme(&self, resolved: ResolvedTheme) {
        self.state.send_if_modified(|s| {
            if s.resolved == resolved {
                return false;
            }
            s.resolved = resolved;
            true
        });
    }
}
