pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;

pub use db::create_pool;

use actix_web::web;

/// Mount the JSON API under `/api` together with the shared extractor settings.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    handlers::extractor_config(cfg);
    cfg.service(web::scope("/api").configure(handlers::init_routes));
}
