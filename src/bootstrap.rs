//! Session bootstrap: restore persisted state and keep the theme resolved.
//!
//! SYSTEM CONTEXT
//! ==============
//! Runs once per application load, before any screen renders. It restores
//! the theme preference and the signed-in user from durable storage, then
//! keeps the store's resolved light/dark value in step with both the user's
//! preference and the OS color scheme.
//!
//! DESIGN
//! ======
//! The OS signal is a `watch` channel ([`SystemColorScheme`]) so tests and
//! the CLI can drive it. A spawned watcher selects over the OS channel and the
//! theme store's own channel. Every theme notification re-resolves from the
//! current preference and OS value; `set_resolved_theme` only notifies on an
//! actual change, so the watcher's own write settles after one round. OS
//! changes re-resolve only while the preference is `system`.
//!
//! Teardown is explicit: [`SessionBootstrap::initialize`] returns a
//! [`BootstrapHandle`] whose `unsubscribe` (or drop) stops the watcher.

#[cfg(test)]
#[path = "bootstrap_test.rs"]
mod tests;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::state::AppState;
use crate::state::theme::{ThemeState, ThemeStore};
use crate::types::{ResolvedTheme, ThemePreference};

// =============================================================================
// OS COLOR SCHEME
// =============================================================================

/// Publisher of the operating system's preferred color scheme.
#[derive(Clone, Debug)]
pub struct SystemColorScheme {
    tx: Arc<watch::Sender<ResolvedTheme>>,
}

impl SystemColorScheme {
    #[must_use]
    pub fn new(initial: ResolvedTheme) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    #[must_use]
    pub fn current(&self) -> ResolvedTheme {
        *self.tx.borrow()
    }

    /// Report a new OS scheme. Subscribers are notified only on change.
    pub fn set(&self, scheme: ResolvedTheme) {
        self.tx.send_if_modified(|current| {
            if *current == scheme {
                return false;
            }
            *current = scheme;
            true
        });
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ResolvedTheme> {
        self.tx.subscribe()
    }
}

impl Default for SystemColorScheme {
    fn default() -> Self {
        Self::new(ResolvedTheme::Light)
    }
}

// =============================================================================
// BOOTSTRAP
// =============================================================================

pub struct SessionBootstrap {
    state: AppState,
    initialized: AtomicBool,
}

impl SessionBootstrap {
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self { state, initialized: AtomicBool::new(false) }
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Restore persisted state and start tracking theme changes.
    ///
    /// Must be called from within a tokio runtime. Only the first call does
    /// anything; later calls return an inactive handle.
    pub fn initialize(&self) -> BootstrapHandle {
        if self.initialized.swap(true, Ordering::SeqCst) {
            debug!("session bootstrap already initialized");
            return BootstrapHandle { task: None };
        }

        let theme = Arc::clone(&self.state.theme);
        theme.initialize_theme();
        let user = self.state.auth.load_stored_user();

        // Subscribe before the first resolve so nothing between the two is missed.
        let prefs = theme.subscribe();
        let system = self.state.system_scheme.subscribe();
        let preference = theme.preference();
        theme.set_resolved_theme(preference.resolve(self.state.system_scheme.current()));

        info!(
            %preference,
            resolved = %theme.resolved(),
            user_id = ?user.as_ref().map(|u| u.id.as_str()),
            "session bootstrap complete"
        );

        let task = tokio::spawn(watch_theme(theme, prefs, system));
        BootstrapHandle { task: Some(task) }
    }
}

/// Keeps the resolved theme current until aborted.
async fn watch_theme(
    theme: Arc<ThemeStore>,
    mut prefs: watch::Receiver<ThemeState>,
    mut system: watch::Receiver<ResolvedTheme>,
) {
    let mut system_open = true;
    loop {
        tokio::select! {
            changed = prefs.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = prefs.borrow_and_update().preference;
                let os = *system.borrow();
                theme.set_resolved_theme(current.resolve(os));
                debug!(preference = %current, resolved = %theme.resolved(), "theme re-resolved");
            }
            changed = system.changed(), if system_open => {
                if changed.is_err() {
                    system_open = false;
                    continue;
                }
                let os = *system.borrow_and_update();
                if theme.preference() == ThemePreference::System {
                    theme.set_resolved_theme(os);
                    debug!(resolved = %os, "followed system color scheme");
                }
            }
        }
    }
}

// =============================================================================
// HANDLE
// =============================================================================

/// Subscription handle for the bootstrap's theme watcher.
#[must_use = "dropping the handle stops theme tracking"]
#[derive(Debug)]
pub struct BootstrapHandle {
    task: Option<JoinHandle<()>>,
}

impl BootstrapHandle {
    /// Whether the theme watcher is still running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop tracking OS and preference changes.
    pub fn unsubscribe(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("theme watcher stopped");
        }
    }
}

impl Drop for BootstrapHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
