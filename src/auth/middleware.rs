use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{Payload, ServiceRequest, ServiceResponse};
use actix_web::http::header::{self, Header};
use actix_web::middleware::Next;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError, web};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use sea_orm::DatabaseConnection;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::debug;

use crate::auth::authorization::ensure_admin;
use crate::auth::identity::IdentityService;
use crate::auth::jwt::Principal;
use crate::cache::RedisCache;
use crate::db::users as user_db;
use crate::error::ApiError;

/// Name of the HttpOnly cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session-token";

/// Where unauthenticated page requests are sent.
pub const SIGN_IN_PAGE: &str = "/auth/signin";

/// Session token from `Authorization: Bearer`, falling back to the session cookie.
pub fn session_token(req: &HttpRequest) -> Option<String> {
    if let Ok(auth) = Authorization::<Bearer>::parse(req) {
        return Some(auth.into_scheme().token().to_string());
    }
    req.cookie(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Validate the caller's session and load the current account state.
///
/// Fails with `Unauthorized` for a missing, invalid, expired or revoked token,
/// and for accounts that no longer exist or were deactivated.
pub async fn resolve_principal(req: &HttpRequest) -> Result<Principal, ApiError> {
    let token = session_token(req).ok_or(ApiError::Unauthorized)?;

    let identity = req
        .app_data::<web::Data<Arc<IdentityService>>>()
        .ok_or_else(|| ApiError::Internal("Identity service not configured".to_string()))?;

    let claims = identity.sessions().validate(&token).map_err(|e| {
        debug!("Rejected session token: {e}");
        ApiError::Unauthorized
    })?;
    let mut principal = Principal::try_from(claims).map_err(|e| {
        debug!("Rejected session token: {e}");
        ApiError::Unauthorized
    })?;

    if let Some(cache) = req.app_data::<web::Data<Arc<RedisCache>>>() {
        if cache.is_session_revoked(&principal.jti).await {
            return Err(ApiError::Unauthorized);
        }
    }

    let db = req
        .app_data::<web::Data<DatabaseConnection>>()
        .ok_or_else(|| ApiError::Internal("Database not configured".to_string()))?;

    let user = user_db::get_user_by_id(db.get_ref(), principal.id)
        .await?
        .filter(|u| u.is_active)
        .ok_or(ApiError::Unauthorized)?;

    // Role and name follow the stored account, not the token snapshot.
    principal.role = user.role;
    principal.name = user.name;

    Ok(principal)
}

/// Gate for admin API scopes: 401 without a valid session, 403 for non-admins.
pub async fn require_admin<B: MessageBody + 'static>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error> {
    let outcome = resolve_principal(req.request())
        .await
        .and_then(|principal| ensure_admin(&principal).map(|()| principal));

    match outcome {
        Ok(principal) => {
            req.extensions_mut().insert(principal);
            next.call(req).await.map(ServiceResponse::map_into_left_body)
        }
        Err(e) => Ok(req.into_response(e.error_response()).map_into_right_body()),
    }
}

/// Gate for the admin pages: anything short of an admin session is redirected to sign-in.
pub async fn require_admin_page<B: MessageBody + 'static>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error> {
    match resolve_principal(req.request()).await {
        Ok(principal) if principal.is_admin() => {
            req.extensions_mut().insert(principal);
            next.call(req).await.map(ServiceResponse::map_into_left_body)
        }
        _ => {
            let redirect = HttpResponse::Found()
                .insert_header((header::LOCATION, SIGN_IN_PAGE))
                .finish();
            Ok(req.into_response(redirect).map_into_right_body())
        }
    }
}

/// The signed-in caller. Placed in request extensions by the gate; outside
/// a gated scope the session is resolved on demand.
pub struct AuthenticatedUser(pub Principal);

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            if let Some(principal) = req.extensions().get::<Principal>().cloned() {
                return Ok(AuthenticatedUser(principal));
            }

            let principal = resolve_principal(&req).await?;
            Ok(AuthenticatedUser(principal))
        })
    }
}
