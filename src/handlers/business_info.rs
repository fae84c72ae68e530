use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::auth::authorization::is_valid_email;
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{RedisCache, keys};
use crate::db::business_info as business_db;
use crate::error::ApiError;
use crate::models::business_info::BusinessInfoInput;

/// GET /api/business-info — 404 until the profile is first saved.
pub async fn get_business_info(
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let info = business_db::get_business_info(db.get_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Business info not found".to_string()))?;
    Ok(HttpResponse::Ok().json(info))
}

/// POST /api/business-info — create or replace the single profile row.
pub async fn upsert_business_info(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    body: web::Json<BusinessInfoInput>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    super::require_fields(&[
        ("companyName", input.company_name.as_deref()),
        ("email", input.email.as_deref()),
        ("phone", input.phone.as_deref()),
    ])?;
    if !input.email.as_deref().is_some_and(is_valid_email) {
        return Err(ApiError::Validation("Invalid email address".to_string()));
    }

    let info = business_db::upsert_business_info(db.get_ref(), input, Some(user.0.email)).await?;
    cache.invalidate(&keys::business_info()).await;

    tracing::info!("Business info updated");
    Ok(HttpResponse::Ok().json(info))
}
