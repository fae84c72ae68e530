use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{RedisCache, keys};
use crate::db::settings as setting_db;
use crate::error::ApiError;
use crate::models::settings::{SettingListQuery, SettingWrite, UpsertSetting, value_to_text};

/// GET /api/settings — paginated list.
pub async fn get_settings(
    db: web::Data<DatabaseConnection>,
    query: web::Query<SettingListQuery>,
) -> Result<HttpResponse, ApiError> {
    let (items, pagination) = setting_db::list_settings(db.get_ref(), &query).await?;
    Ok(super::paged("settings", items, pagination))
}

/// POST /api/settings — create (201) or update (200) by key.
pub async fn upsert_setting(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    body: web::Json<UpsertSetting>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    let key = input.key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty());
    let value = input.value.filter(|v| !v.is_null());

    let (Some(key), Some(value)) = (key.clone(), value.clone()) else {
        let mut missing = Vec::new();
        if key.is_none() {
            missing.push("key");
        }
        if value.is_none() {
            missing.push("value");
        }
        return Err(ApiError::missing_fields(&missing));
    };

    let (setting, created) = setting_db::upsert_setting(
        db.get_ref(),
        SettingWrite {
            key,
            value: value_to_text(value),
            description: input.description,
            is_public: input.is_public,
            updated_by: Some(user.0.email),
        },
    )
    .await?;

    cache.invalidate(&keys::public_settings()).await;

    if created {
        Ok(HttpResponse::Created().json(setting))
    } else {
        Ok(HttpResponse::Ok().json(setting))
    }
}

/// GET /api/settings/{key}
pub async fn get_setting(
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let key = path.into_inner();
    let setting = setting_db::get_setting_by_key(db.get_ref(), &key)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Setting '{key}' not found")))?;
    Ok(HttpResponse::Ok().json(setting))
}

/// DELETE /api/settings/{key}
pub async fn delete_setting(
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let key = path.into_inner();
    let result = setting_db::delete_setting(db.get_ref(), &key).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound(format!("Setting '{key}' not found")));
    }

    cache.invalidate(&keys::public_settings()).await;
    Ok(super::deleted("Setting"))
}
