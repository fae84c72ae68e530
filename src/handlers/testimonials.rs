use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::db::testimonials as testimonial_db;
use crate::error::ApiError;
use crate::models::testimonials::{
    MAX_RATING, MIN_RATING, PatchTestimonial, ReorderRequest, TestimonialInput,
    TestimonialListQuery,
};

fn check_rating(rating: Option<i32>) -> Result<(), ApiError> {
    match rating {
        Some(r) if !(MIN_RATING..=MAX_RATING).contains(&r) => Err(ApiError::Validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}"
        ))),
        _ => Ok(()),
    }
}

fn check_required(input: &TestimonialInput) -> Result<(), ApiError> {
    super::require_fields(&[
        ("customerName", input.customer_name.as_deref()),
        ("testimonialText", input.testimonial_text.as_deref()),
    ])?;
    check_rating(input.rating)
}

/// GET /api/content/testimonials — filtered, paginated list.
pub async fn get_testimonials(
    db: web::Data<DatabaseConnection>,
    query: web::Query<TestimonialListQuery>,
) -> Result<HttpResponse, ApiError> {
    let (items, pagination) = testimonial_db::list_testimonials(db.get_ref(), &query).await?;
    Ok(super::paged("testimonials", items, pagination))
}

/// POST /api/content/testimonials — create a testimonial.
pub async fn create_testimonial(
    db: web::Data<DatabaseConnection>,
    body: web::Json<TestimonialInput>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    check_required(&input)?;

    let created = testimonial_db::insert_testimonial(db.get_ref(), input).await?;
    tracing::info!(id = %created.id, "Created testimonial");
    Ok(HttpResponse::Created().json(created))
}

/// GET /api/content/testimonials/{id}
pub async fn get_testimonial(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let testimonial = testimonial_db::get_testimonial_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Testimonial {id} not found")))?;
    Ok(HttpResponse::Ok().json(testimonial))
}

/// PUT /api/content/testimonials/{id} — overwrite every field.
pub async fn replace_testimonial(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<TestimonialInput>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    check_required(&input)?;

    let updated = testimonial_db::replace_testimonial(db.get_ref(), path.into_inner(), input).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// PATCH /api/content/testimonials/{id} — merge the present fields.
pub async fn patch_testimonial(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<PatchTestimonial>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    check_rating(input.rating)?;

    let updated = testimonial_db::patch_testimonial(db.get_ref(), path.into_inner(), input).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/content/testimonials/{id}
pub async fn delete_testimonial(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let result = testimonial_db::delete_testimonial(db.get_ref(), id).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound(format!("Testimonial {id} not found")));
    }
    Ok(super::deleted("Testimonial"))
}

/// PUT /api/content/testimonials/reorder — set many display orders at once.
///
/// All-or-nothing: one unknown id rolls the batch back and answers 400.
pub async fn reorder(
    db: web::Data<DatabaseConnection>,
    body: web::Json<ReorderRequest>,
) -> Result<HttpResponse, ApiError> {
    let items = body.into_inner().into_items();
    if items.is_empty() {
        return Err(ApiError::Validation("No testimonials to reorder".to_string()));
    }

    let results = testimonial_db::reorder_testimonials(db.get_ref(), &items).await?;
    let updated = results.iter().filter(|r| r.success).count();

    if updated == results.len() {
        Ok(HttpResponse::Ok().json(serde_json::json!({
            "results": results,
            "updated": updated,
        })))
    } else {
        Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Reorder failed; no changes were applied",
            "results": results,
        })))
    }
}

/// GET /api/content/testimonials/stats
pub async fn get_stats(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, ApiError> {
    let stats = testimonial_db::testimonial_stats(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(stats))
}
