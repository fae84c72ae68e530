pub mod auth;
pub mod business_info;
pub mod contact;
pub mod customers;
pub mod dashboard;
pub mod forms;
pub mod ops;
pub mod pages;
pub mod portfolio;
pub mod public;
pub mod settings;
pub mod testimonials;
pub mod users;

use actix_web::middleware::from_fn;
use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::auth::middleware::require_admin;
use crate::error::ApiError;
use crate::models::Pagination;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Public: operations, sign-in, contact intake, site content ──
    cfg.route("/health", web::get().to(ops::health));
    cfg.route("/db/health", web::get().to(ops::db_health));
    cfg.service(
        web::resource("/db/seed")
            .wrap(from_fn(require_admin))
            .route(web::post().to(ops::seed)),
    );
    cfg.service(
        web::resource("/db/reset")
            .wrap(from_fn(require_admin))
            .route(web::post().to(ops::reset)),
    );

    cfg.service(
        web::scope("/auth")
            .route("/signin/credentials", web::post().to(auth::sign_in_credentials))
            .route("/signin/google", web::post().to(auth::sign_in_google))
            .route("/session", web::get().to(auth::session))
            .route("/signout", web::post().to(auth::sign_out)),
    );

    cfg.route("/contact", web::post().to(contact::submit_contact));

    cfg.service(
        web::scope("/public")
            .route("/business-info", web::get().to(public::business_info))
            .route("/settings", web::get().to(public::settings))
            .route("/pages/{slug}", web::get().to(public::page))
            .route("/testimonials", web::get().to(public::testimonials))
            .route("/portfolio", web::get().to(public::portfolio)),
    );

    // ── Admin API (every route behind the admin gate) ──
    cfg.service(
        web::scope("/content")
            .wrap(from_fn(require_admin))
            .route("/testimonials", web::get().to(testimonials::get_testimonials))
            .route("/testimonials", web::post().to(testimonials::create_testimonial))
            .route("/testimonials/stats", web::get().to(testimonials::get_stats))
            .route("/testimonials/reorder", web::put().to(testimonials::reorder))
            .route("/testimonials/{id}", web::get().to(testimonials::get_testimonial))
            .route("/testimonials/{id}", web::put().to(testimonials::replace_testimonial))
            .route("/testimonials/{id}", web::patch().to(testimonials::patch_testimonial))
            .route("/testimonials/{id}", web::delete().to(testimonials::delete_testimonial))
            .route("/portfolio", web::get().to(portfolio::get_portfolios))
            .route("/portfolio", web::post().to(portfolio::create_portfolio))
            .route("/portfolio/stats", web::get().to(portfolio::get_stats))
            .route("/portfolio/{id}", web::get().to(portfolio::get_portfolio))
            .route("/portfolio/{id}", web::put().to(portfolio::replace_portfolio))
            .route("/portfolio/{id}", web::patch().to(portfolio::patch_portfolio))
            .route("/portfolio/{id}", web::delete().to(portfolio::delete_portfolio))
            .route("/pages", web::get().to(pages::get_pages))
            .route("/pages/{slug}", web::get().to(pages::get_page))
            .route("/pages/{slug}", web::put().to(pages::upsert_page))
            .route("/pages/{slug}", web::delete().to(pages::delete_page)),
    );

    cfg.service(
        web::scope("/customers")
            .wrap(from_fn(require_admin))
            .route("", web::get().to(customers::get_customers))
            .route("", web::post().to(customers::create_customer))
            .route("/stats", web::get().to(customers::get_stats))
            .route("/{id}", web::get().to(customers::get_customer))
            .route("/{id}", web::put().to(customers::replace_customer))
            .route("/{id}", web::patch().to(customers::patch_customer))
            .route("/{id}", web::delete().to(customers::delete_customer)),
    );

    cfg.service(
        web::scope("/forms")
            .wrap(from_fn(require_admin))
            .route("", web::get().to(forms::get_submissions))
            .route("/stats", web::get().to(forms::get_stats))
            .route("/bulk", web::patch().to(forms::bulk_update))
            .route("/{id}", web::get().to(forms::get_submission))
            .route("/{id}", web::patch().to(forms::update_submission))
            .route("/{id}", web::delete().to(forms::delete_submission))
            .route("/{id}/respond", web::post().to(forms::respond))
            .route("/{id}/responses", web::get().to(forms::get_responses)),
    );

    cfg.service(
        web::scope("/settings")
            .wrap(from_fn(require_admin))
            .route("", web::get().to(settings::get_settings))
            .route("", web::post().to(settings::upsert_setting))
            .route("/{key}", web::get().to(settings::get_setting))
            .route("/{key}", web::delete().to(settings::delete_setting)),
    );

    cfg.service(
        web::resource("/business-info")
            .wrap(from_fn(require_admin))
            .route(web::get().to(business_info::get_business_info))
            .route(web::post().to(business_info::upsert_business_info)),
    );

    cfg.service(
        web::scope("/users")
            .wrap(from_fn(require_admin))
            .route("", web::get().to(users::get_users))
            .route("", web::post().to(users::create_user))
            .route("/{id}", web::get().to(users::get_user))
            .route("/{id}", web::patch().to(users::update_user))
            .route("/{id}", web::delete().to(users::delete_user)),
    );

    cfg.service(
        web::scope("/dashboard")
            .wrap(from_fn(require_admin))
            .route("/stats", web::get().to(dashboard::get_stats)),
    );
}

/// Body/query/path extraction failures render as 400 `{"error": ...}`.
pub fn extractor_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::Validation(format!("Invalid request body: {err}")).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::Validation(format!("Invalid query parameters: {err}")).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        ApiError::Validation(format!("Invalid path parameter: {err}")).into()
    }));
}

/// `{<key>: [...], pagination: {...}}`
pub(crate) fn paged<T: Serialize>(key: &str, items: Vec<T>, pagination: Pagination) -> HttpResponse {
    let mut body = serde_json::Map::new();
    body.insert(key.to_string(), serde_json::json!(items));
    body.insert("pagination".to_string(), serde_json::json!(pagination));
    HttpResponse::Ok().json(serde_json::Value::Object(body))
}

/// 400 naming every field that is absent or blank.
pub(crate) fn require_fields(fields: &[(&str, Option<&str>)]) -> Result<(), ApiError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::missing_fields(&missing))
    }
}

pub(crate) fn deleted(what: &str) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "message": format!("{what} deleted successfully") }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_counts_as_missing() {
        let err = require_fields(&[
            ("customerName", Some("  ")),
            ("testimonialText", None),
            ("rating", Some("5")),
        ])
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required fields: customerName, testimonialText"
        );
        assert!(require_fields(&[("key", Some("x"))]).is_ok());
    }
}
