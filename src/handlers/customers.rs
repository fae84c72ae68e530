use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::is_valid_email;
use crate::db::customers as customer_db;
use crate::error::ApiError;
use crate::models::customers::{CustomerInput, CustomerListQuery, PatchCustomer};

fn check_email(email: Option<&str>) -> Result<(), ApiError> {
    match email {
        Some(e) if !is_valid_email(e) => Err(ApiError::Validation("Invalid email address".to_string())),
        _ => Ok(()),
    }
}

fn check_required(input: &CustomerInput) -> Result<(), ApiError> {
    super::require_fields(&[
        ("firstName", input.first_name.as_deref()),
        ("lastName", input.last_name.as_deref()),
        ("email", input.email.as_deref()),
    ])?;
    check_email(input.email.as_deref())
}

/// GET /api/customers — filtered, paginated list.
pub async fn get_customers(
    db: web::Data<DatabaseConnection>,
    query: web::Query<CustomerListQuery>,
) -> Result<HttpResponse, ApiError> {
    let (items, pagination) = customer_db::list_customers(db.get_ref(), &query).await?;
    Ok(super::paged("customers", items, pagination))
}

/// POST /api/customers
pub async fn create_customer(
    db: web::Data<DatabaseConnection>,
    body: web::Json<CustomerInput>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    check_required(&input)?;

    let created = customer_db::insert_customer(db.get_ref(), input).await?;
    Ok(HttpResponse::Created().json(created))
}

/// GET /api/customers/{id}
pub async fn get_customer(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let customer = customer_db::get_customer_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Customer {id} not found")))?;
    Ok(HttpResponse::Ok().json(customer))
}

/// PUT /api/customers/{id}
pub async fn replace_customer(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<CustomerInput>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    check_required(&input)?;

    let updated = customer_db::replace_customer(db.get_ref(), path.into_inner(), input).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// PATCH /api/customers/{id}
pub async fn patch_customer(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<PatchCustomer>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    check_email(input.email.as_deref())?;

    let updated = customer_db::patch_customer(db.get_ref(), path.into_inner(), input).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/customers/{id}
pub async fn delete_customer(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let result = customer_db::delete_customer(db.get_ref(), id).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound(format!("Customer {id} not found")));
    }
    Ok(super::deleted("Customer"))
}

/// GET /api/customers/stats
pub async fn get_stats(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, ApiError> {
    let stats = customer_db::customer_stats(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(stats))
}
