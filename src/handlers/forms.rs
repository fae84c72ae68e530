use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::forms as form_db;
use crate::db::users as user_db;
use crate::error::ApiError;
use crate::models::form_responses::{NewResponse, RespondRequest};
use crate::models::form_submissions::{BulkUpdateRequest, SubmissionListQuery, UpdateSubmission};

/// An assignee must be an existing user.
async fn check_assignee(db: &DatabaseConnection, assignee: Option<Option<Uuid>>) -> Result<(), ApiError> {
    if let Some(Some(user_id)) = assignee {
        if user_db::get_user_by_id(db, user_id).await?.is_none() {
            return Err(ApiError::Validation(format!("User {user_id} does not exist")));
        }
    }
    Ok(())
}

/// GET /api/forms — filtered, paginated list of submissions.
pub async fn get_submissions(
    db: web::Data<DatabaseConnection>,
    query: web::Query<SubmissionListQuery>,
) -> Result<HttpResponse, ApiError> {
    let (items, pagination) = form_db::list_submissions(db.get_ref(), &query).await?;
    Ok(super::paged("submissions", items, pagination))
}

/// GET /api/forms/{id} — a submission together with its responses.
pub async fn get_submission(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let submission = form_db::get_submission_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Form submission {id} not found")))?;
    let responses = form_db::get_responses_for_submission(db.get_ref(), id).await?;

    let mut body = serde_json::json!(submission);
    body["responses"] = serde_json::json!(responses);
    Ok(HttpResponse::Ok().json(body))
}

/// PATCH /api/forms/{id} — status, priority, notes, tags, assignee.
pub async fn update_submission(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateSubmission>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    check_assignee(db.get_ref(), input.assigned_to_id).await?;

    let updated = form_db::update_submission(db.get_ref(), path.into_inner(), input).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/forms/{id}
pub async fn delete_submission(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let result = form_db::delete_submission(db.get_ref(), id).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound(format!("Form submission {id} not found")));
    }
    Ok(super::deleted("Form submission"))
}

/// PATCH /api/forms/bulk — same changes applied to many submissions, all or nothing.
pub async fn bulk_update(
    db: web::Data<DatabaseConnection>,
    body: web::Json<BulkUpdateRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    if request.ids.is_empty() {
        return Err(ApiError::Validation("ids must not be empty".to_string()));
    }
    if request.updates.is_empty() {
        return Err(ApiError::Validation("updates must change at least one field".to_string()));
    }
    check_assignee(db.get_ref(), request.updates.assigned_to_id).await?;

    let results =
        form_db::bulk_update_submissions(db.get_ref(), &request.ids, &request.updates).await?;
    let updated = results.iter().filter(|r| r.success).count();

    if updated == results.len() {
        tracing::info!(updated, "Bulk-updated form submissions");
        Ok(HttpResponse::Ok().json(serde_json::json!({
            "results": results,
            "updated": updated,
        })))
    } else {
        Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Bulk update failed; no changes were applied",
            "results": results,
        })))
    }
}

/// POST /api/forms/{id}/respond — record a reply from the signed-in admin.
pub async fn respond(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<RespondRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    let content = request.content.filter(|c| !c.trim().is_empty());
    let (content, method) = match (content, request.method) {
        (Some(content), Some(method)) => (content, method),
        (content, method) => {
            let mut missing = Vec::new();
            if content.is_none() {
                missing.push("content");
            }
            if method.is_none() {
                missing.push("method");
            }
            return Err(ApiError::missing_fields(&missing));
        }
    };

    let principal = user.0;
    let response = form_db::respond_to_submission(
        db.get_ref(),
        path.into_inner(),
        NewResponse {
            responder_id: principal.id,
            responder_name: Some(principal.display_name()),
            method,
            content,
            attachments: request.attachments,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(response))
}

/// GET /api/forms/{id}/responses
pub async fn get_responses(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if form_db::get_submission_by_id(db.get_ref(), id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Form submission {id} not found")));
    }
    let responses = form_db::get_responses_for_submission(db.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "responses": responses })))
}

/// GET /api/forms/stats
pub async fn get_stats(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, ApiError> {
    let stats = form_db::form_stats(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(stats))
}
