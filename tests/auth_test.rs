///! Integration tests for session tokens and the credential rules.
///!
///! Tokens are minted locally with the same HS256 secret the server uses and
///! validated through `validate_token` / `SessionKeys`. No server or database
///! is needed.
///!
///! Run with: `cargo test --test auth_test`
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use siteadmin_backend::auth::identity::{AuthError, IdentityService};
use siteadmin_backend::auth::jwt::{Claims, Principal, SessionKeys, validate_token};
use siteadmin_backend::config::AuthConfig;
use siteadmin_backend::models::users::{self, Role};

/// A fake secret for testing; never the real one.
const TEST_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

fn test_user(role: Role) -> users::Model {
    let now = Utc::now();
    users::Model {
        id: Uuid::new_v4(),
        name: Some("Alice Smith".to_string()),
        email: "alice@example.com".to_string(),
        image: None,
        role,
        is_active: true,
        password_hash: None,
        created_at: now,
        updated_at: now,
    }
}

fn mint(claims: &Claims, secret: &str) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to encode test JWT")
}

#[test]
fn test_issued_token_round_trips_into_principal() {
    let keys = SessionKeys::new(TEST_SECRET, 24);
    let user = test_user(Role::Admin);

    let issued = keys.issue(&user).expect("Token should be issued");
    let claims = validate_token(&issued.token, TEST_SECRET).expect("Token should be valid");

    assert_eq!(claims.sub, user.id.to_string());
    assert_eq!(claims.email, "alice@example.com");
    assert_eq!(claims.role, Role::Admin);
    assert_eq!(claims.jti, issued.jti);

    let principal = Principal::try_from(claims).expect("Claims should map to a principal");
    assert_eq!(principal.id, user.id);
    assert!(principal.is_admin());
    assert_eq!(principal.display_name(), "Alice Smith");
}

#[test]
fn test_expiry_follows_session_ttl() {
    let keys = SessionKeys::new(TEST_SECRET, 720);
    let now = Utc::now();

    let issued = keys.issue_at(&test_user(Role::Admin), now).unwrap();

    let expected = now + Duration::hours(720);
    assert!((issued.expires_at - expected).num_seconds().abs() <= 1);
}

#[test]
fn test_expired_token_is_rejected() {
    let now = Utc::now().timestamp() as usize;

    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        email: "expired@example.com".to_string(),
        name: None,
        role: Role::Admin,
        jti: Uuid::new_v4().to_string(),
        iat: now - 3600,
        exp: now - 300,
    };

    let result = validate_token(&mint(&claims, TEST_SECRET), TEST_SECRET);
    assert!(result.is_err(), "Expired token should be rejected");
}

#[test]
fn test_wrong_secret_is_rejected() {
    let keys = SessionKeys::new("a-completely-different-secret-value-0123456789", 1);
    let issued = keys.issue(&test_user(Role::Admin)).unwrap();

    let result = validate_token(&issued.token, TEST_SECRET);
    assert!(result.is_err(), "Token signed with another secret should be rejected");
}

#[test]
fn test_garbage_token_is_rejected() {
    assert!(validate_token("not.a.jwt", TEST_SECRET).is_err());
    assert!(validate_token("", TEST_SECRET).is_err());
}

#[test]
fn test_non_admin_role_survives_round_trip() {
    let keys = SessionKeys::new(TEST_SECRET, 1);
    let issued = keys.issue(&test_user(Role::User)).unwrap();

    let principal = Principal::try_from(keys.validate(&issued.token).unwrap()).unwrap();
    assert!(!principal.is_admin());
}

#[test]
fn test_credential_rules_apply_in_order() {
    let identity = IdentityService::new(&AuthConfig::new(
        &["owner@example.com"],
        &["crew.example.com"],
        TEST_SECRET,
    ));

    // Shape first: even a too-short password reports the malformed email.
    assert!(matches!(
        identity.check_credentials("owner.example.com", "x"),
        Err(AuthError::MalformedEmail)
    ));
    // Then the allow-list.
    assert!(matches!(
        identity.check_credentials("intruder@example.com", "x"),
        Err(AuthError::NotAllowed)
    ));
    // Then the password length.
    assert!(matches!(
        identity.check_credentials("owner@example.com", "seven77"),
        Err(AuthError::PasswordTooShort)
    ));

    assert_eq!(
        identity
            .check_credentials("OWNER@example.com", "eight888")
            .unwrap(),
        "owner@example.com"
    );
    assert!(identity
        .check_credentials("tech@crew.example.com", "long enough")
        .is_ok());
}
