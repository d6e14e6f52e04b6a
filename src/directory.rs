//! Mock user directory.
//!
//! DESIGN
//! ======
//! The directory is an owned repository handed to the auth store, not a
//! process-wide static. Inserts check uniqueness under the same lock that
//! appends, so id/email/username stay unique however the store is shared.
//! Contents live for the process only; a signed-up user survives a restart
//! solely through the persisted session copy.

#[cfg(test)]
#[path = "directory_test.rs"]
mod tests;

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use time::macros::datetime;

use crate::types::{IdentityField, User};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("duplicate user {field}: {value}")]
pub struct DirectoryError {
    pub field: IdentityField,
    pub value: String,
}

/// In-memory collection of known users.
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: Mutex<Vec<User>>,
}

impl UserDirectory {
    /// Empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory preloaded with the demo accounts.
    #[must_use]
    pub fn seeded() -> Self {
        Self { users: Mutex::new(seed_users()) }
    }

    /// Build a directory from `users`, rejecting any duplicate identity.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Result<Self, DirectoryError> {
        let directory = Self::new();
        for user in users {
            directory.insert(user)?;
        }
        Ok(directory)
    }

    fn users(&self) -> MutexGuard<'_, Vec<User>> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.users().iter().find(|u| u.email == email).cloned()
    }

    #[must_use]
    pub fn find_by_username(&self, username: &str) -> Option<User> {
        self.users().iter().find(|u| u.username == username).cloned()
    }

    #[must_use]
    pub fn contains_id(&self, id: &str) -> bool {
        self.users().iter().any(|u| u.id == id)
    }

    /// First identity attribute of `user` already taken, checking email,
    /// then username, then id.
    #[must_use]
    pub fn conflict(&self, user: &User) -> Option<IdentityField> {
        conflict_in(&self.users(), user)
    }

    /// Append `user` if its email, username and id are all unused.
    pub fn insert(&self, user: User) -> Result<(), DirectoryError> {
        let mut users = self.users();
        if let Some(field) = conflict_in(&users, &user) {
            let value = match field {
                IdentityField::Id => user.id,
                IdentityField::Email => user.email,
                IdentityField::Username => user.username,
            };
            return Err(DirectoryError { field, value });
        }
        users.push(user);
        Ok(())
    }

    /// Remove and return the user with `id`.
    pub fn remove(&self, id: &str) -> Option<User> {
        let mut users = self.users();
        let index = users.iter().position(|u| u.id == id)?;
        Some(users.remove(index))
    }

    #[must_use]
    pub fn ids(&self) -> BTreeSet<String> {
        self.users().iter().map(|u| u.id.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users().is_empty()
    }
}

fn conflict_in(users: &[User], candidate: &User) -> Option<IdentityField> {
    if users.iter().any(|u| u.email == candidate.email) {
        Some(IdentityField::Email)
    } else if users.iter().any(|u| u.username == candidate.username) {
        Some(IdentityField::Username)
    } else if users.iter().any(|u| u.id == candidate.id) {
        Some(IdentityField::Id)
    } else {
        None
    }
}

fn id_set(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|&id| id.to_owned()).collect()
}

fn seed_users() -> Vec<User> {
    vec![
        User {
            id: "1".to_owned(),
            email: "john@example.com".to_owned(),
            username: "johndoe".to_owned(),
            display_name: "John Doe".to_owned(),
            bio: Some("Software developer | Tech enthusiast | Coffee lover ☕".to_owned()),
            avatar: None,
            followers: id_set(&["2", "3"]),
            following: id_set(&["2"]),
            created_at: datetime!(2024-01-15 0:00 UTC),
        },
        User {
            id: "2".to_owned(),
            email: "jane@example.com".to_owned(),
            username: "janedoe".to_owned(),
            display_name: "Jane Doe".to_owned(),
            bio: Some("Designer & Creative | UX/UI enthusiast".to_owned()),
            avatar: None,
            followers: id_set(&["1"]),
            following: id_set(&["1", "3"]),
            created_at: datetime!(2024-02-20 0:00 UTC),
        },
    ]
}
