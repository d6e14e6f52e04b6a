//! Runtime configuration loaded from environment variables.
//!
//! Every knob has a default so the binary runs with no environment at all.
//! CLI flags override these values in `main`.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::path::PathBuf;
use std::time::Duration;

use crate::types::ResolvedTheme;

const DEFAULT_STORAGE_PATH: &str = ".social-session/storage.json";
const DEFAULT_LOGIN_DELAY_MS: u64 = 800;
const DEFAULT_SIGNUP_DELAY_MS: u64 = 800;

/// Simulated round-trip latency for auth operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthDelays {
    pub login: Duration,
    pub signup: Duration,
}

impl AuthDelays {
    /// No artificial latency; used by tests and scripted runs.
    #[must_use]
    pub fn none() -> Self {
        Self { login: Duration::ZERO, signup: Duration::ZERO }
    }
}

impl Default for AuthDelays {
    fn default() -> Self {
        Self {
            login: Duration::from_millis(DEFAULT_LOGIN_DELAY_MS),
            signup: Duration::from_millis(DEFAULT_SIGNUP_DELAY_MS),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Location of the durable storage file.
    pub storage_path: PathBuf,
    pub delays: AuthDelays,
    /// Color scheme reported by the OS at startup.
    pub system_scheme: ResolvedTheme,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            delays: AuthDelays::default(),
            system_scheme: ResolvedTheme::Light,
        }
    }
}

impl SessionConfig {
    /// Load from `SESSION_STORAGE_PATH`, `AUTH_LOGIN_DELAY_MS`,
    /// `AUTH_SIGNUP_DELAY_MS` and `SYSTEM_COLOR_SCHEME`. Unset or unparseable
    /// values fall back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let storage_path = match std::env::var("SESSION_STORAGE_PATH") {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => PathBuf::from(DEFAULT_STORAGE_PATH),
        };
        Self {
            storage_path,
            delays: AuthDelays {
                login: Duration::from_millis(env_parse("AUTH_LOGIN_DELAY_MS", DEFAULT_LOGIN_DELAY_MS)),
                signup: Duration::from_millis(env_parse("AUTH_SIGNUP_DELAY_MS", DEFAULT_SIGNUP_DELAY_MS)),
            },
            system_scheme: env_parse("SYSTEM_COLOR_SCHEME", ResolvedTheme::Light),
        }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
