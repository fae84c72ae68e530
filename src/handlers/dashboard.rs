use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::cache::RedisCache;
use crate::db;
use crate::db::{customers as customer_db, forms as form_db, portfolio as portfolio_db};
use crate::db::testimonials as testimonial_db;
use crate::error::ApiError;

/// Shown until response times are actually tracked.
const AVERAGE_RESPONSE_TIME_PLACEHOLDER: &str = "2 hours";

fn count(stats: &Value, path: &[&str]) -> u64 {
    path.iter()
        .try_fold(stats, |v, key| v.get(*key))
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

/// Share of submissions that got an answer, as a percentage with one decimal.
pub fn response_rate(answered: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (answered as f64 * 1000.0 / total as f64).round() / 10.0
}

/// GET /api/dashboard/stats — one-call overview for the admin home page.
pub async fn get_stats(
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
) -> Result<HttpResponse, ApiError> {
    let conn = db.get_ref();

    let forms = form_db::form_stats(conn).await?;
    let customers = customer_db::customer_stats(conn).await?;
    let testimonials = testimonial_db::testimonial_stats(conn).await?;
    let portfolio = portfolio_db::portfolio_stats(conn).await?;
    let recent = form_db::get_recent_submissions(conn, 5).await?;
    let (rating_sum, rating_count) = testimonial_db::rating_totals(conn, true).await?;

    let total_forms = count(&forms, &["total"]);
    let answered =
        count(&forms, &["byStatus", "RESPONDED"]) + count(&forms, &["byStatus", "COMPLETED"]);

    let database_ok = db::ping(conn).await.is_ok();
    let cache_status = if cache.ping().await {
        "connected"
    } else if cache.is_enabled() {
        "disconnected"
    } else {
        "disabled"
    };
    let (status, database) = if database_ok {
        ("healthy", "connected")
    } else {
        ("degraded", "disconnected")
    };

    let body = json!({
        "overview": {
            "totalSubmissions": total_forms,
            "newSubmissions": count(&forms, &["byStatus", "NEW"]),
            "submissionsThisMonth": count(&forms, &["thisMonth"]),
            "totalCustomers": count(&customers, &["total"]),
            "activeCustomers": count(&customers, &["active"]),
            "totalTestimonials": count(&testimonials, &["total"]),
            "visibleTestimonials": count(&testimonials, &["visible"]),
            "portfolioItems": count(&portfolio, &["total"]),
        },
        "formsByStatus": forms["byStatus"],
        "formsByPriority": forms["byPriority"],
        "recentSubmissions": recent,
        "performance": {
            "averageResponseTime": AVERAGE_RESPONSE_TIME_PLACEHOLDER,
            "customerSatisfaction": db::stats::average(rating_sum, rating_count),
            "responseRate": response_rate(answered, total_forms),
        },
        "systemHealth": {
            "status": status,
            "database": database,
            "cache": cache_status,
        },
    });

    Ok(HttpResponse::Ok().json(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_rate_rounds_to_one_decimal() {
        assert_eq!(response_rate(0, 0), 0.0);
        assert_eq!(response_rate(1, 3), 33.3);
        assert_eq!(response_rate(2, 2), 100.0);
    }

    #[test]
    fn count_walks_nested_keys() {
        let stats = json!({"byStatus": {"NEW": 4}, "total": 9});
        assert_eq!(count(&stats, &["byStatus", "NEW"]), 4);
        assert_eq!(count(&stats, &["total"]), 9);
        assert_eq!(count(&stats, &["byStatus", "ARCHIVED"]), 0);
    }
}
