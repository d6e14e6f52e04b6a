//! Client-side session state.
//!
//! DESIGN
//! ======
//! State is split by domain (`auth`, `theme`) so screens depend on small
//! focused stores. [`AppState`] is the composition root that builds both
//! stores over one durable storage and one user directory.

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

pub mod auth;
pub mod theme;

use std::sync::Arc;

use crate::bootstrap::SystemColorScheme;
use crate::config::{AuthDelays, SessionConfig};
use crate::directory::UserDirectory;
use crate::storage::{DurableStorage, FileStorage, MemoryStorage};

use self::auth::AuthStore;
use self::theme::ThemeStore;

/// Shared application state handed to screens and the bootstrap.
/// Clone is cheap; every field is Arc-wrapped or a channel handle.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn DurableStorage>,
    pub auth: Arc<AuthStore>,
    pub theme: Arc<ThemeStore>,
    pub system_scheme: SystemColorScheme,
}

impl AppState {
    /// Build the stores over `storage` with the seeded mock directory.
    #[must_use]
    pub fn new(storage: Arc<dyn DurableStorage>, delays: AuthDelays, system_scheme: SystemColorScheme) -> Self {
        let directory = Arc::new(UserDirectory::seeded());
        Self {
            auth: Arc::new(AuthStore::new(directory, Arc::clone(&storage), delays)),
            theme: Arc::new(ThemeStore::new(Arc::clone(&storage))),
            storage,
            system_scheme,
        }
    }

    /// State backed by the storage file named in `config`.
    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        let storage: Arc<dyn DurableStorage> = Arc::new(FileStorage::new(config.storage_path.clone()));
        Self::new(storage, config.delays, SystemColorScheme::new(config.system_scheme))
    }

    /// Ephemeral state with no latency; nothing is written to disk.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()), AuthDelays::none(), SystemColorScheme::default())
    }
}
