use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::is_valid_email;
use crate::auth::middleware::AuthenticatedUser;
use crate::auth::password::hash_password_blocking;
use crate::config::MIN_PASSWORD_LEN;
use crate::db::is_unique_violation;
use crate::db::users as user_db;
use crate::error::ApiError;
use crate::models::users::{CreateUser, Role, UpdateUser, UserListQuery, UserResponse};

async fn hash_new_password(password: Option<String>) -> Result<Option<String>, ApiError> {
    match password {
        None => Ok(None),
        Some(p) if p.chars().count() < MIN_PASSWORD_LEN => Err(ApiError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        ))),
        Some(p) => hash_password_blocking(p)
            .await
            .map(Some)
            .map_err(ApiError::Internal),
    }
}

/// GET /api/users — paginated list of accounts.
pub async fn get_users(
    db: web::Data<DatabaseConnection>,
    query: web::Query<UserListQuery>,
) -> Result<HttpResponse, ApiError> {
    let (users, pagination) = user_db::list_users(db.get_ref(), &query).await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(super::paged("users", users, pagination))
}

/// POST /api/users — create an account up-front.
pub async fn create_user(
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateUser>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    super::require_fields(&[("email", input.email.as_deref())])?;

    let email = input.email.unwrap_or_default().trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(ApiError::Validation("Invalid email address".to_string()));
    }
    if user_db::get_user_by_email(db.get_ref(), &email).await?.is_some() {
        return Err(ApiError::Validation(format!("User {email} already exists")));
    }
    let password_hash = hash_new_password(input.password.clone()).await?;

    let user = user_db::create_user(
        db.get_ref(),
        email.clone(),
        input.name,
        input.role.unwrap_or(Role::Admin),
        password_hash,
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Validation(format!("User {email} already exists"))
        } else {
            ApiError::from(e)
        }
    })?;

    tracing::info!(user_id = %user.id, "Created user");
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// GET /api/users/{id}
pub async fn get_user(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let user = user_db::get_user_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {id} not found")))?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// PATCH /api/users/{id} — name, image, role, active flag or password.
pub async fn update_user(
    caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateUser>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let input = body.into_inner();

    if id == caller.0.id && (input.is_active == Some(false) || input.role == Some(Role::User)) {
        return Err(ApiError::Validation(
            "You cannot deactivate or demote your own account".to_string(),
        ));
    }
    let password_hash = hash_new_password(input.password.clone()).await?;

    let user = user_db::update_user(db.get_ref(), id, input, password_hash).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// DELETE /api/users/{id} — soft delete (deactivate).
pub async fn delete_user(
    caller: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if id == caller.0.id {
        return Err(ApiError::Validation(
            "You cannot deactivate your own account".to_string(),
        ));
    }

    let user = user_db::deactivate_user(db.get_ref(), id).await?;
    tracing::info!(user_id = %user.id, "Deactivated user");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "User deactivated successfully",
        "user": UserResponse::from(user),
    })))
}
