use super::*;
use crate::storage::{THEME_KEY, USER_KEY};
use crate::types::{ResolvedTheme, ThemePreference};

#[tokio::test]
async fn stores_share_one_storage() {
    let state = AppState::in_memory();
    state.auth.login("john@example.com", "x").await.unwrap();
    state.theme.set_theme(ThemePreference::Dark);
    assert!(state.storage.get(USER_KEY).unwrap().is_some());
    assert_eq!(state.storage.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
}

#[test]
fn in_memory_state_starts_signed_out_with_default_theme() {
    let state = AppState::in_memory();
    assert!(state.auth.current_user().is_none());
    assert_eq!(state.theme.preference(), ThemePreference::System);
    assert_eq!(state.system_scheme.current(), ResolvedTheme::Light);
}

#[tokio::test]
async fn from_config_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let config = SessionConfig {
        storage_path: dir.path().join("storage.json"),
        delays: AuthDelays::none(),
        system_scheme: ResolvedTheme::Dark,
    };

    let first = AppState::from_config(&config);
    first.auth.login("jane@example.com", "x").await.unwrap();
    first.theme.set_theme(ThemePreference::Light);
    assert_eq!(first.system_scheme.current(), ResolvedTheme::Dark);

    let second = AppState::from_config(&config);
    assert_eq!(second.auth.load_stored_user().unwrap().username, "janedoe");
    second.theme.initialize_theme();
    assert_eq!(second.theme.preference(), ThemePreference::Light);
}

#[test]
fn clones_share_stores() {
    let state = AppState::in_memory();
    let clone = state.clone();
    clone.theme.set_theme(ThemePreference::Dark);
    assert_eq!(state.theme.preference(), ThemePreference::Dark);
}
