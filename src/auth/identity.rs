use sea_orm::{DatabaseConnection, DbErr};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::auth::authorization::{AllowList, is_valid_email};
use crate::auth::jwks::GoogleKeyCache;
use crate::auth::jwt::{IssuedToken, SessionKeys};
use crate::auth::password::verify_password_blocking;
use crate::config::AuthConfig;
use crate::db::users as user_db;
use crate::models::users::{self, CreateUserFromAuth, Role, UserResponse};

/// Why a sign-in attempt failed. Callers only ever see "Invalid credentials".
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("malformed email address")]
    MalformedEmail,
    #[error("email is not on the allow-list")]
    NotAllowed,
    #[error("password is too short")]
    PasswordTooShort,
    #[error("account is deactivated")]
    AccountDisabled,
    #[error("password does not match")]
    WrongPassword,
    #[error("google sign-in is not configured")]
    GoogleDisabled,
    #[error("invalid id token: {0}")]
    InvalidIdToken(String),
    #[error("google account email is not verified")]
    EmailNotVerified,
    #[error("failed to issue session: {0}")]
    Session(String),
    #[error("database error: {0}")]
    Store(#[from] DbErr),
}

/// A successful sign-in: the session token plus the signed-in user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedIn {
    pub token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub user: UserResponse,
    #[serde(skip)]
    pub jti: String,
}

impl SignedIn {
    fn new(issued: IssuedToken, user: users::Model) -> Self {
        Self {
            token: issued.token,
            expires_at: issued.expires_at,
            user: user.into(),
            jti: issued.jti,
        }
    }
}

/// Decides who may sign in and issues their session tokens.
pub struct IdentityService {
    allow_list: AllowList,
    sessions: SessionKeys,
    google: Option<GoogleKeyCache>,
    min_password_len: usize,
    secure_cookies: bool,
}

impl IdentityService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            allow_list: AllowList::from_config(config),
            sessions: SessionKeys::new(&config.session_secret, config.session_ttl_hours),
            google: config.google_client_id.as_deref().map(GoogleKeyCache::new),
            min_password_len: config.min_password_len,
            secure_cookies: config.secure_cookies,
        }
    }

    pub fn sessions(&self) -> &SessionKeys {
        &self.sessions
    }

    pub fn secure_cookies(&self) -> bool {
        self.secure_cookies
    }

    pub fn google_enabled(&self) -> bool {
        self.google.is_some()
    }

    /// Stateless part of the credentials check, in order: email shape, allow-list, length.
    /// Returns the normalized (lower-cased) email.
    pub fn check_credentials(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let email = email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(AuthError::MalformedEmail);
        }
        if !self.allow_list.permits(&email) {
            return Err(AuthError::NotAllowed);
        }
        if password.chars().count() < self.min_password_len {
            return Err(AuthError::PasswordTooShort);
        }
        Ok(email)
    }

    pub async fn sign_in_with_credentials(
        &self,
        db: &DatabaseConnection,
        email: &str,
        password: &str,
    ) -> Result<SignedIn, AuthError> {
        let email = self.check_credentials(email, password)?;

        let user = user_db::find_or_create_from_auth(
            db,
            CreateUserFromAuth {
                email,
                name: None,
                image: None,
                role: Role::Admin,
            },
        )
        .await?;

        if !user.is_active {
            return Err(AuthError::AccountDisabled);
        }
        if let Some(hash) = user.password_hash.as_deref() {
            let matches = verify_password_blocking(password.to_string(), hash.to_string())
                .await
                .map_err(|e| {
                    warn!(user_id = %user.id, "Unreadable password hash: {e}");
                    AuthError::WrongPassword
                })?;
            if !matches {
                return Err(AuthError::WrongPassword);
            }
        }

        self.issue(user)
    }

    pub async fn sign_in_with_google(
        &self,
        db: &DatabaseConnection,
        id_token: &str,
    ) -> Result<SignedIn, AuthError> {
        let google = self.google.as_ref().ok_or(AuthError::GoogleDisabled)?;

        let claims = google
            .validate_id_token(id_token)
            .await
            .map_err(AuthError::InvalidIdToken)?;
        if !claims.email_verified {
            return Err(AuthError::EmailNotVerified);
        }

        let email = claims
            .email
            .as_deref()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| is_valid_email(e))
            .ok_or(AuthError::MalformedEmail)?;
        if !self.allow_list.permits(&email) {
            return Err(AuthError::NotAllowed);
        }

        let user = user_db::find_or_create_from_auth(
            db,
            CreateUserFromAuth {
                email,
                name: claims.name,
                image: claims.picture,
                role: Role::Admin,
            },
        )
        .await?;

        if !user.is_active {
            return Err(AuthError::AccountDisabled);
        }

        self.issue(user)
    }

    fn issue(&self, user: users::Model) -> Result<SignedIn, AuthError> {
        let issued = self.sessions.issue(&user).map_err(AuthError::Session)?;
        info!(user_id = %user.id, "Signed in");
        Ok(SignedIn::new(issued, user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> IdentityService {
        IdentityService::new(&AuthConfig::new(
            &["owner@example.com"],
            &["staff.example.org"],
            "0123456789abcdef0123456789abcdef",
        ))
    }

    #[test]
    fn shape_is_checked_before_allow_list() {
        assert!(matches!(
            service().check_credentials("not-an-email", "short"),
            Err(AuthError::MalformedEmail)
        ));
    }

    #[test]
    fn allow_list_is_checked_before_length() {
        assert!(matches!(
            service().check_credentials("stranger@example.com", "x"),
            Err(AuthError::NotAllowed)
        ));
    }

    #[test]
    fn short_password_is_rejected() {
        assert!(matches!(
            service().check_credentials("owner@example.com", "1234567"),
            Err(AuthError::PasswordTooShort)
        ));
    }

    #[test]
    fn accepted_email_is_normalized() {
        let email = service()
            .check_credentials(" Owner@Example.COM ", "12345678")
            .unwrap();
        assert_eq!(email, "owner@example.com");
        assert!(service().check_credentials("a@staff.example.org", "12345678").is_ok());
    }

    #[test]
    fn google_is_off_without_client_id() {
        assert!(!service().google_enabled());
    }
}
