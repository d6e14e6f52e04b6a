//! Auth-session state for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route guards and user-aware screens read the session from here. Login and
//! signup resolve against the injected [`UserDirectory`]; the signed-in user
//! is mirrored to durable storage under `mockUser` so a reload can restore
//! it.
//!
//! DESIGN
//! ======
//! Each operation is a method returning `Result`, and drives the same
//! loading/error transitions the screens render: `is_loading` is raised on
//! start and lowered on completion, a failure records its message, a success
//! clears it. State lives in a `watch` channel so the bootstrap and views can
//! subscribe to changes.
//!
//! ERROR HANDLING
//! ==============
//! Restoring a session never fails hard. A corrupt payload is logged, the key
//! is cleared, and the store reports "signed out".

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::AuthDelays;
use crate::directory::{DirectoryError, UserDirectory};
use crate::storage::{self, DurableStorage, StorageError, USER_KEY};
use crate::types::{FormError, IdentityField, SignupRequest, User};

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("{}", duplicate_message(.0))]
    DuplicateIdentity(IdentityField),
    #[error("Failed to parse stored user: {0}")]
    CorruptState(String),
    #[error(transparent)]
    Validation(#[from] FormError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

fn duplicate_message(field: &IdentityField) -> &'static str {
    match field {
        IdentityField::Email => "Email already registered",
        IdentityField::Username => "Username already taken",
        IdentityField::Id => "User id already exists",
    }
}

impl From<DirectoryError> for AuthError {
    fn from(e: DirectoryError) -> Self {
        Self::DuplicateIdentity(e.field)
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Snapshot of the auth store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_loading: bool,
    /// Message from the last failed login or signup.
    pub error: Option<String>,
}

// =============================================================================
// STORE
// =============================================================================

pub struct AuthStore {
    directory: Arc<UserDirectory>,
    storage: Arc<dyn DurableStorage>,
    delays: AuthDelays,
    state: watch::Sender<AuthState>,
}

impl AuthStore {
    #[must_use]
    pub fn new(directory: Arc<UserDirectory>, storage: Arc<dyn DurableStorage>, delays: AuthDelays) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self { directory, storage, delays, state }
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    #[must_use]
    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Sign in as the directory user with `email`.
    ///
    /// The password is not checked; any value is accepted for a known email.
    pub async fn login(&self, email: &str, _password: &str) -> Result<User, AuthError> {
        self.begin();
        simulate_latency(self.delays.login).await;
        let result = self.try_login(email);
        self.finish(&result);
        match &result {
            Ok(user) => info!(user_id = %user.id, username = %user.username, "login succeeded"),
            Err(e) => info!(%email, error = %e, "login rejected"),
        }
        result
    }

    fn try_login(&self, email: &str) -> Result<User, AuthError> {
        let user = self.directory.find_by_email(email).ok_or(AuthError::InvalidCredentials)?;
        storage::save_json(self.storage.as_ref(), USER_KEY, &user)?;
        Ok(user)
    }

    /// Register a new user and sign in as them.
    pub async fn signup(&self, request: SignupRequest) -> Result<User, AuthError> {
        self.begin();
        simulate_latency(self.delays.signup).await;
        let result = self.try_signup(request);
        self.finish(&result);
        match &result {
            Ok(user) => info!(user_id = %user.id, username = %user.username, "signup succeeded"),
            Err(e) => info!(error = %e, "signup rejected"),
        }
        result
    }

    fn try_signup(&self, request: SignupRequest) -> Result<User, AuthError> {
        let mut user = User {
            id: self.fresh_id(),
            email: request.email,
            username: request.username,
            display_name: request.display_name,
            bio: None,
            avatar: None,
            followers: BTreeSet::new(),
            following: BTreeSet::new(),
            created_at: OffsetDateTime::now_utc(),
        };
        // The directory re-checks under its lock; an id collision there means
        // a concurrent insert took our id, so draw a new one.
        loop {
            match self.directory.insert(user.clone()) {
                Ok(()) => break,
                Err(DirectoryError { field: IdentityField::Id, .. }) => user.id = self.fresh_id(),
                Err(e) => return Err(e.into()),
            }
        }
        // Roll back the insert if the session cannot be saved.
        if let Err(e) = storage::save_json(self.storage.as_ref(), USER_KEY, &user) {
            self.directory.remove(&user.id);
            return Err(e.into());
        }
        Ok(user)
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.directory.contains_id(&id) {
                return id;
            }
        }
    }

    /// Restore the persisted session, if any.
    ///
    /// Never fails: an unreadable or corrupt payload clears the stored key and
    /// yields `None`.
    pub fn load_stored_user(&self) -> Option<User> {
        self.state.send_modify(|s| s.is_loading = true);
        let user = match self.read_stored_user() {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "discarding stored session");
                if let Err(e) = self.storage.remove(USER_KEY) {
                    warn!(error = %e, "failed to clear stored session");
                }
                None
            }
        };
        match &user {
            Some(u) => debug!(user_id = %u.id, "restored stored session"),
            None => debug!("no stored session"),
        }
        self.state.send_modify(|s| {
            s.is_loading = false;
            s.user.clone_from(&user);
        });
        user
    }

    fn read_stored_user(&self) -> Result<Option<User>, AuthError> {
        let stored = storage::load_json::<User>(self.storage.as_ref(), USER_KEY)
            .map_err(|e| AuthError::CorruptState(e.to_string()))?;
        match stored {
            None => Ok(None),
            Some(Ok(user)) => Ok(Some(user)),
            Some(Err(e)) => Err(AuthError::CorruptState(e.to_string())),
        }
    }

    /// End the session and forget the persisted user.
    pub fn logout(&self) {
        let previous = self.state.borrow().user.as_ref().map(|u| u.id.clone());
        self.state.send_modify(|s| {
            s.user = None;
            s.error = None;
        });
        if let Err(e) = self.storage.remove(USER_KEY) {
            warn!(error = %e, "failed to clear stored session");
        }
        info!(user_id = ?previous, "logged out");
    }

    /// Forget the last login/signup error message.
    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    fn begin(&self) {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });
    }

    fn finish(&self, result: &Result<User, AuthError>) {
        self.state.send_modify(|s| {
            s.is_loading = false;
            match result {
                Ok(user) => {
                    s.user = Some(user.clone());
                    s.error = None;
                }
                Err(e) => s.error = Some(e.to_string()),
            }
        });
    }
}

async fn simulate_latency(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
