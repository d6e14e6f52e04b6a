//! Shared domain types for users, sessions and themes.
//!
//! DESIGN
//! ======
//! `User` serializes with camelCase field names and an RFC 3339 `createdAt`
//! so the persisted session payload keeps the shape the web client writes
//! under the `mockUser` key. Theme enums render as their lowercase literal
//! strings, which is also their persisted form.

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Minimum accepted password length on the signup form.
pub const MIN_PASSWORD_LEN: usize = 6;

// =============================================================================
// USER
// =============================================================================

/// Identity record for a member of the network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque unique identifier.
    pub id: String,
    /// Unique login email.
    pub email: String,
    /// Unique handle shown as `@username`.
    pub username: String,
    /// Name shown on posts and the profile header.
    pub display_name: String,
    /// Free-form profile text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Avatar image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// IDs of users following this user.
    #[serde(default)]
    pub followers: BTreeSet<String>,
    /// IDs of users this user follows.
    #[serde(default)]
    pub following: BTreeSet<String>,
    /// Account creation time.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Which unique user attribute collided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentityField {
    Id,
    Email,
    Username,
}

impl IdentityField {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Email => "email",
            Self::Username => "username",
        }
    }
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// SIGNUP
// =============================================================================

/// Payload accepted by the auth store's signup operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
    pub display_name: String,
    pub password: String,
}

/// Signup form input before client-side checks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub email: String,
    pub username: String,
    pub display_name: String,
    pub password: String,
    pub confirm_password: String,
}

/// Rejections raised by signup form validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("All fields are required")]
    MissingField,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
}

impl SignupForm {
    /// Check the form and turn it into a [`SignupRequest`].
    ///
    /// Checks run in order: required fields, password confirmation, then
    /// password length. Identity uniqueness is left to the auth store.
    pub fn validate(self) -> Result<SignupRequest, FormError> {
        let required = [&self.email, &self.username, &self.display_name, &self.password];
        if required.iter().any(|v| v.trim().is_empty()) {
            return Err(FormError::MissingField);
        }
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FormError::PasswordTooShort);
        }
        Ok(SignupRequest {
            email: self.email,
            username: self.username,
            display_name: self.display_name,
            password: self.password,
        })
    }
}

// =============================================================================
// THEME
// =============================================================================

/// Error returned when a string is not a recognized theme literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme `{0}`")]
pub struct ParseThemeError(pub String);

/// The user's chosen theme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    /// Follow the operating system's color scheme.
    #[default]
    System,
}

impl ThemePreference {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    /// Concrete theme for this preference given the OS color scheme.
    #[must_use]
    pub fn resolve(self, system: ResolvedTheme) -> ResolvedTheme {
        match self {
            Self::Light => ResolvedTheme::Light,
            Self::Dark => ResolvedTheme::Dark,
            Self::System => system,
        }
    }
}

impl FromStr for ThemePreference {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(ParseThemeError(other.to_owned())),
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The light/dark value actually applied to the UI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedTheme {
    #[default]
    Light,
    Dark,
}

impl ResolvedTheme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

impl FromStr for ResolvedTheme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ParseThemeError(other.to_owned())),
        }
    }
}

impl fmt::Display for ResolvedTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
