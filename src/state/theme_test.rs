use super::*;
use crate::storage::{MemoryStorage, StorageError};

fn store() -> (ThemeStore, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    (ThemeStore::new(Arc::clone(&storage) as Arc<dyn DurableStorage>), storage)
}

/// Storage whose every operation fails.
struct BrokenStorage;

impl DurableStorage for BrokenStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Io { path: "broken".into(), source: std::io::Error::other("disk gone") })
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Io { path: "broken".into(), source: std::io::Error::other("disk gone") })
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Io { path: "broken".into(), source: std::io::Error::other("disk gone") })
    }
}

// =============================================================================
// Defaults / initialize_theme
// =============================================================================

#[test]
fn theme_state_defaults() {
    let (store, _) = store();
    assert_eq!(store.preference(), ThemePreference::System);
    assert_eq!(store.resolved(), ResolvedTheme::Light);
}

#[test]
fn initialize_without_stored_value_keeps_system() {
    let (store, _) = store();
    store.initialize_theme();
    assert_eq!(store.preference(), ThemePreference::System);
}

#[test]
fn initialize_adopts_each_recognized_literal() {
    for (raw, expected) in [
        ("light", ThemePreference::Light),
        ("dark", ThemePreference::Dark),
        ("system", ThemePreference::System),
    ] {
        let (store, storage) = store();
        storage.set(THEME_KEY, raw).unwrap();
        store.initialize_theme();
        assert_eq!(store.preference(), expected, "stored {raw}");
    }
}

#[test]
fn initialize_ignores_unrecognized_value() {
    let (store, storage) = store();
    storage.set(THEME_KEY, "solarized").unwrap();
    store.initialize_theme();
    assert_eq!(store.preference(), ThemePreference::System);
}

#[test]
fn initialize_with_broken_storage_keeps_default() {
    let store = ThemeStore::new(Arc::new(BrokenStorage));
    store.initialize_theme();
    assert_eq!(store.preference(), ThemePreference::System);
}

// =============================================================================
// set_theme / set_resolved_theme
// =============================================================================

#[test]
fn set_theme_updates_and_persists() {
    let (store, storage) = store();
    store.set_theme(ThemePreference::Dark);
    assert_eq!(store.preference(), ThemePreference::Dark);
    assert_eq!(storage.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
}

#[test]
fn set_theme_survives_store_restart() {
    let (store, storage) = store();
    store.set_theme(ThemePreference::Light);
    let restarted = ThemeStore::new(storage);
    restarted.initialize_theme();
    assert_eq!(restarted.preference(), ThemePreference::Light);
}

#[test]
fn set_theme_does_not_touch_resolved() {
    let (store, _) = store();
    store.set_theme(ThemePreference::Dark);
    assert_eq!(store.resolved(), ResolvedTheme::Light);
}

#[test]
fn set_theme_with_broken_storage_still_changes_preference() {
    let store = ThemeStore::new(Arc::new(BrokenStorage));
    store.set_theme(ThemePreference::Dark);
    assert_eq!(store.preference(), ThemePreference::Dark);
}

#[test]
fn set_resolved_theme_updates_state() {
    let (store, _) = store();
    store.set_resolved_theme(ResolvedTheme::Dark);
    assert_eq!(store.state(), ThemeState { preference: ThemePreference::System, resolved: ResolvedTheme::Dark });
}

#[test]
fn set_resolved_theme_notifies_only_on_change() {
    let (store, _) = store();
    let mut rx = store.subscribe();
    store.set_resolved_theme(ResolvedTheme::Light);
    assert!(!rx.has_changed().unwrap());
    store.set_resolved_theme(ResolvedTheme::Dark);
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().resolved, ResolvedTheme::Dark);
}

#[test]
fn set_theme_notifies_subscribers() {
    let (store, _) = store();
    let mut rx = store.subscribe();
    store.set_theme(ThemePreference::Light);
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().preference, ThemePreference::Light);
}
