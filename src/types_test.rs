use super::*;
use time::macros::datetime;

fn sample_user() -> User {
    User {
        id: "1".to_owned(),
        email: "john@example.com".to_owned(),
        username: "johndoe".to_owned(),
        display_name: "John Doe".to_owned(),
        bio: Some("Coffee lover".to_owned()),
        avatar: None,
        followers: ["3".to_owned(), "2".to_owned()].into_iter().collect(),
        following: ["2".to_owned()].into_iter().collect(),
        created_at: datetime!(2024-01-15 0:00 UTC),
    }
}

fn form() -> SignupForm {
    SignupForm {
        email: "new@example.com".to_owned(),
        username: "newbie".to_owned(),
        display_name: "New Person".to_owned(),
        password: "secret1".to_owned(),
        confirm_password: "secret1".to_owned(),
    }
}

// =============================================================================
// User serde
// =============================================================================

#[test]
fn user_serializes_camel_case_fields() {
    let json = serde_json::to_value(sample_user()).unwrap();
    assert_eq!(json["displayName"], "John Doe");
    assert_eq!(json["createdAt"], "2024-01-15T00:00:00Z");
    assert!(json.get("display_name").is_none());
}

#[test]
fn user_omits_missing_avatar() {
    let json = serde_json::to_value(sample_user()).unwrap();
    assert!(json.get("avatar").is_none());
    assert_eq!(json["bio"], "Coffee lover");
}

#[test]
fn user_follower_sets_serialize_sorted() {
    let json = serde_json::to_value(sample_user()).unwrap();
    assert_eq!(json["followers"], serde_json::json!(["2", "3"]));
}

#[test]
fn user_reparses_timestamp_from_persisted_json() {
    let raw = serde_json::to_string(&sample_user()).unwrap();
    let restored: User = serde_json::from_str(&raw).unwrap();
    assert_eq!(restored, sample_user());
    assert_eq!(restored.created_at.year(), 2024);
}

#[test]
fn user_accepts_millisecond_iso_timestamps() {
    let raw = r#"{
        "id": "1",
        "email": "john@example.com",
        "username": "johndoe",
        "displayName": "John Doe",
        "followers": ["2", "3"],
        "following": ["2"],
        "createdAt": "2024-01-15T00:00:00.000Z"
    }"#;
    let user: User = serde_json::from_str(raw).unwrap();
    assert_eq!(user.created_at, datetime!(2024-01-15 0:00 UTC));
    assert!(user.bio.is_none());
}

#[test]
fn user_rejects_non_timestamp_created_at() {
    let raw = r#"{"id":"1","email":"a","username":"b","displayName":"c","createdAt":"yesterday"}"#;
    assert!(serde_json::from_str::<User>(raw).is_err());
}

// =============================================================================
// SignupForm
// =============================================================================

#[test]
fn signup_form_valid_produces_request() {
    let request = form().validate().unwrap();
    assert_eq!(request.email, "new@example.com");
    assert_eq!(request.username, "newbie");
    assert_eq!(request.display_name, "New Person");
    assert_eq!(request.password, "secret1");
}

#[test]
fn signup_form_blank_field_rejected() {
    let f = SignupForm { username: "  ".to_owned(), ..form() };
    assert_eq!(f.validate(), Err(FormError::MissingField));
}

#[test]
fn signup_form_mismatched_passwords_rejected() {
    let f = SignupForm { confirm_password: "secret2".to_owned(), ..form() };
    let err = f.validate().unwrap_err();
    assert_eq!(err, FormError::PasswordMismatch);
    assert_eq!(err.to_string(), "Passwords do not match");
}

#[test]
fn signup_form_short_password_rejected() {
    let f = SignupForm { password: "abc".to_owned(), confirm_password: "abc".to_owned(), ..form() };
    let err = f.validate().unwrap_err();
    assert_eq!(err, FormError::PasswordTooShort);
    assert_eq!(err.to_string(), "Password must be at least 6 characters");
}

#[test]
fn signup_form_mismatch_checked_before_length() {
    let f = SignupForm { password: "abc".to_owned(), confirm_password: "abd".to_owned(), ..form() };
    assert_eq!(f.validate(), Err(FormError::PasswordMismatch));
}

#[test]
fn signup_form_exact_minimum_length_accepted() {
    let f = SignupForm { password: "abcdef".to_owned(), confirm_password: "abcdef".to_owned(), ..form() };
    assert!(f.validate().is_ok());
}

// =============================================================================
// Theme enums
// =============================================================================

#[test]
fn theme_preference_default_is_system() {
    assert_eq!(ThemePreference::default(), ThemePreference::System);
    assert_eq!(ResolvedTheme::default(), ResolvedTheme::Light);
}

#[test]
fn theme_preference_parses_literals() {
    assert_eq!("light".parse::<ThemePreference>(), Ok(ThemePreference::Light));
    assert_eq!("dark".parse::<ThemePreference>(), Ok(ThemePreference::Dark));
    assert_eq!("system".parse::<ThemePreference>(), Ok(ThemePreference::System));
}

#[test]
fn theme_preference_rejects_unknown_and_case_variants() {
    assert!("Dark".parse::<ThemePreference>().is_err());
    assert!("sepia".parse::<ThemePreference>().is_err());
    assert!("".parse::<ThemePreference>().is_err());
}

#[test]
fn resolved_theme_rejects_system() {
    assert_eq!(
        "system".parse::<ResolvedTheme>(),
        Err(ParseThemeError("system".to_owned()))
    );
}

#[test]
fn theme_display_matches_persisted_literal() {
    assert_eq!(ThemePreference::Dark.to_string(), "dark");
    assert_eq!(ResolvedTheme::Light.to_string(), "light");
    assert_eq!(serde_json::to_string(&ThemePreference::System).unwrap(), "\"system\"");
}

#[test]
fn resolve_explicit_preference_ignores_system() {
    assert_eq!(ThemePreference::Light.resolve(ResolvedTheme::Dark), ResolvedTheme::Light);
    assert_eq!(ThemePreference::Dark.resolve(ResolvedTheme::Light), ResolvedTheme::Dark);
}

#[test]
fn resolve_system_preference_follows_system() {
    assert_eq!(ThemePreference::System.resolve(ResolvedTheme::Dark), ResolvedTheme::Dark);
    assert_eq!(ThemePreference::System.resolve(ResolvedTheme::Light), ResolvedTheme::Light);
}

#[test]
fn identity_field_display() {
    assert_eq!(IdentityField::Email.to_string(), "email");
    assert_eq!(IdentityField::Username.to_string(), "username");
    assert_eq!(IdentityField::Id.to_string(), "id");
}
