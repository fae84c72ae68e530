use actix_web::{HttpRequest, HttpResponse, web};
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use std::time::Instant;

use crate::config::AppConfig;
use crate::db;
use crate::db::seed;
use crate::error::ApiError;

/// Process start time, registered as app data for the uptime figure.
#[derive(Debug, Clone, Copy)]
pub struct StartedAt(pub Instant);

/// GET /api/health — liveness; never touches the database.
pub async fn health(req: HttpRequest) -> HttpResponse {
    let uptime = req
        .app_data::<web::Data<StartedAt>>()
        .map(|s| s.0.elapsed().as_secs())
        .unwrap_or(0);

    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "uptimeSeconds": uptime,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api/db/health — readiness; 503 when the store does not answer.
pub async fn db_health(db: web::Data<DatabaseConnection>) -> HttpResponse {
    let started = Instant::now();
    match db::ping(db.get_ref()).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "database": "connected",
            "responseTimeMs": started.elapsed().as_millis() as u64,
        })),
        Err(e) => {
            tracing::error!("Database health check failed: {e}");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unhealthy",
                "database": "disconnected",
            }))
        }
    }
}

/// POST /api/db/seed — sample content for empty tables.
pub async fn seed(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, ApiError> {
    let report = seed::seed_sample_data(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Seed completed",
        "inserted": report,
    })))
}

/// POST /api/db/reset — drop everything, migrate from scratch, seed. Development only.
pub async fn reset(
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let development = req
        .app_data::<web::Data<AppConfig>>()
        .is_some_and(|c| c.environment.is_development());
    if !development {
        return Err(ApiError::Forbidden);
    }

    tracing::warn!("Resetting database");
    Migrator::fresh(db.get_ref()).await?;
    let report = seed::seed_sample_data(db.get_ref()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Database reset",
        "inserted": report,
    })))
}
