use actix_cors::Cors;
use actix_files::Files;
use actix_web::middleware::{Logger, from_fn};
use actix_web::{App, HttpServer, web};
use migration::{Migrator, MigratorTrait};
use siteadmin_backend::auth::identity::IdentityService;
use siteadmin_backend::auth::middleware::require_admin_page;
use siteadmin_backend::cache::RedisCache;
use siteadmin_backend::config::AppConfig;
use siteadmin_backend::handlers::ops::StartedAt;
use siteadmin_backend::{configure_api, create_pool};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {e}");
        std::io::Error::other(e)
    })?;

    let db = create_pool(&config.database_url).await.map_err(|e| {
        tracing::error!("Failed to connect to database: {e}");
        std::io::Error::other(e)
    })?;
    Migrator::up(&db, None).await.map_err(|e| {
        tracing::error!("Failed to run migrations: {e}");
        std::io::Error::other(e)
    })?;
    tracing::info!("Database ready");
    let db_data = web::Data::new(db);

    // Redis is optional; without it public reads are uncached and sign-out
    // only clears the cookie.
    let redis_cache = match &config.redis_url {
        Some(url) => match RedisCache::new(url).await {
            Ok(cache) => {
                tracing::info!("Connected to Redis");
                cache
            }
            Err(e) => {
                tracing::warn!("Redis unavailable, cache disabled: {e}");
                RedisCache::disabled()
            }
        },
        None => RedisCache::disabled(),
    };
    let redis_data = web::Data::new(Arc::new(redis_cache));

    let identity = web::Data::new(Arc::new(IdentityService::new(&config.auth)));
    if !identity.google_enabled() {
        tracing::info!("GOOGLE_CLIENT_ID not set; Google sign-in disabled");
    }

    let started = web::Data::new(StartedAt(Instant::now()));
    let config_data = web::Data::new(config.clone());

    let bind_addr = format!("0.0.0.0:{}", config.port);
    tracing::info!(environment = ?config.environment, "Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = match &config.cors_origin {
            Some(origin) => Cors::default().allowed_origin(origin).supports_credentials(),
            None => Cors::default().allow_any_origin(),
        }
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            actix_web::http::header::AUTHORIZATION,
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::ACCEPT,
        ])
        .max_age(3600);

        let mut app = App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(db_data.clone())
            .app_data(redis_data.clone())
            .app_data(identity.clone())
            .app_data(started.clone())
            .app_data(config_data.clone())
            .configure(configure_api);

        if let Some(admin_dir) = &config.admin_dir {
            app = app.service(
                web::scope("/admin")
                    .wrap(from_fn(require_admin_page))
                    .service(Files::new("", admin_dir).index_file("index.html")),
            );
        }
        if let Some(static_dir) = &config.static_dir {
            app = app.service(Files::new("/", static_dir).index_file("index.html"));
        }

        app
    })
    .bind(&bind_addr)?
    .run()
    .await
}
