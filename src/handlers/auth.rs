use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use std::sync::Arc;

use crate::auth::identity::{IdentityService, SignedIn};
use crate::auth::middleware::{AuthenticatedUser, SESSION_COOKIE};
use crate::cache::RedisCache;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleSignInRequest {
    pub id_token: String,
}

fn signed_in_response(identity: &IdentityService, signed_in: SignedIn) -> HttpResponse {
    let max_age = (signed_in.expires_at - chrono::Utc::now()).num_seconds().max(0);
    let cookie = Cookie::build(SESSION_COOKIE, signed_in.token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(identity.secure_cookies())
        .max_age(CookieDuration::seconds(max_age))
        .finish();

    HttpResponse::Ok().cookie(cookie).json(signed_in)
}

/// POST /api/auth/signin/credentials — allow-listed email + password.
pub async fn sign_in_credentials(
    db: web::Data<DatabaseConnection>,
    identity: web::Data<Arc<IdentityService>>,
    body: web::Json<CredentialsRequest>,
) -> Result<HttpResponse, ApiError> {
    let signed_in = identity
        .sign_in_with_credentials(db.get_ref(), &body.email, &body.password)
        .await?;
    Ok(signed_in_response(&identity, signed_in))
}

/// POST /api/auth/signin/google — exchange a Google ID token for a session.
pub async fn sign_in_google(
    db: web::Data<DatabaseConnection>,
    identity: web::Data<Arc<IdentityService>>,
    body: web::Json<GoogleSignInRequest>,
) -> Result<HttpResponse, ApiError> {
    let signed_in = identity
        .sign_in_with_google(db.get_ref(), &body.id_token)
        .await?;
    Ok(signed_in_response(&identity, signed_in))
}

/// GET /api/auth/session — the current principal.
pub async fn session(user: AuthenticatedUser) -> HttpResponse {
    let principal = user.0;
    HttpResponse::Ok().json(serde_json::json!({
        "user": principal,
        "expiresAt": principal.expires_at,
    }))
}

/// POST /api/auth/signout — revoke the session and clear the cookie.
pub async fn sign_out(
    user: AuthenticatedUser,
    cache: web::Data<Arc<RedisCache>>,
) -> HttpResponse {
    let principal = user.0;
    let remaining = (principal.expires_at - chrono::Utc::now())
        .to_std()
        .unwrap_or_default();

    if let Err(e) = cache.revoke_session(&principal.jti, remaining).await {
        tracing::warn!(user_id = %principal.id, "Failed to revoke session: {e}");
    }

    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();

    tracing::info!(user_id = %principal.id, "Signed out");
    HttpResponse::Ok()
        .cookie(cookie)
        .json(serde_json::json!({ "message": "Signed out" }))
}
