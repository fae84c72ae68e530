use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{RedisCache, keys};
use crate::db::pages as page_db;
use crate::error::ApiError;
use crate::models::page_contents::{PageInput, is_valid_slug};

fn slug_from(path: web::Path<String>) -> Result<String, ApiError> {
    let slug = path.into_inner();
    if is_valid_slug(&slug) {
        Ok(slug)
    } else {
        Err(ApiError::Validation(format!("Invalid page slug '{slug}'")))
    }
}

/// GET /api/content/pages
pub async fn get_pages(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, ApiError> {
    let pages = page_db::list_pages(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "pages": pages })))
}

/// GET /api/content/pages/{slug}
pub async fn get_page(
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let slug = slug_from(path)?;
    let page = page_db::get_page_by_slug(db.get_ref(), &slug)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Page '{slug}' not found")))?;
    Ok(HttpResponse::Ok().json(page))
}

/// PUT /api/content/pages/{slug} — create (201) or replace (200).
pub async fn upsert_page(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<String>,
    body: web::Json<PageInput>,
) -> Result<HttpResponse, ApiError> {
    let slug = slug_from(path)?;
    let input = body.into_inner();
    super::require_fields(&[
        ("title", input.title.as_deref()),
        ("content", input.content.as_deref()),
    ])?;

    let (page, created) =
        page_db::upsert_page(db.get_ref(), &slug, input, Some(user.0.email)).await?;
    cache.invalidate(&keys::page(&slug)).await;

    if created {
        Ok(HttpResponse::Created().json(page))
    } else {
        Ok(HttpResponse::Ok().json(page))
    }
}

/// DELETE /api/content/pages/{slug}
pub async fn delete_page(
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let slug = slug_from(path)?;
    let result = page_db::delete_page(db.get_ref(), &slug).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound(format!("Page '{slug}' not found")));
    }

    cache.invalidate(&keys::page(&slug)).await;
    Ok(super::deleted("Page"))
}
