use actix_web::{HttpResponse, web};
use sea_orm::{DatabaseConnection, DbErr};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;

use crate::cache::{PUBLIC_TTL_SECS, RedisCache, keys};
use crate::db::{business_info as business_db, pages as page_db, portfolio as portfolio_db};
use crate::db::{settings as setting_db, testimonials as testimonial_db};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct PortfolioFilter {
    pub category: Option<String>,
}

/// Read-through: serve `key` from the cache, or load it and cache the result.
/// A cache failure falls back to the database.
async fn read_through<T, F, Fut>(cache: &RedisCache, key: &str, load: F) -> Result<Option<T>, DbErr>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Option<T>, DbErr>>,
{
    match cache.get::<T>(key).await {
        Ok(Some(hit)) => return Ok(Some(hit)),
        Ok(None) => {}
        Err(e) => tracing::warn!("Cache error: {}", e),
    }

    let loaded = load().await?;
    if let Some(value) = &loaded {
        if let Err(e) = cache.set(key, value, Some(PUBLIC_TTL_SECS)).await {
            tracing::warn!("Failed to cache {key}: {e}");
        }
    }
    Ok(loaded)
}

/// GET /api/public/business-info
pub async fn business_info(
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
) -> Result<HttpResponse, ApiError> {
    let info = read_through(&cache, &keys::business_info(), || {
        business_db::get_business_info(db.get_ref())
    })
    .await?
    .ok_or_else(|| ApiError::NotFound("Business info not found".to_string()))?;
    Ok(HttpResponse::Ok().json(info))
}

/// GET /api/public/settings — public settings as a `{key: value}` map.
pub async fn settings(
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
) -> Result<HttpResponse, ApiError> {
    let map = read_through(&cache, &keys::public_settings(), || async {
        setting_db::get_public_settings(db.get_ref()).await.map(Some)
    })
    .await?
    .unwrap_or_default();
    Ok(HttpResponse::Ok().json(map))
}

/// GET /api/public/pages/{slug}
pub async fn page(
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let slug = path.into_inner();
    let page = read_through(&cache, &keys::page(&slug), || {
        page_db::get_page_by_slug(db.get_ref(), &slug)
    })
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("Page '{slug}' not found")))?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/public/testimonials — visible only, featured first.
pub async fn testimonials(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, ApiError> {
    let items = testimonial_db::get_public_testimonials(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "testimonials": items })))
}

/// GET /api/public/portfolio — visible only, optionally `?category=`.
pub async fn portfolio(
    db: web::Data<DatabaseConnection>,
    query: web::Query<PortfolioFilter>,
) -> Result<HttpResponse, ApiError> {
    let items =
        portfolio_db::get_public_portfolios(db.get_ref(), query.into_inner().category).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "portfolioItems": items })))
}
