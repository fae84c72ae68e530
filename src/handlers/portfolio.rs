use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::db::portfolio as portfolio_db;
use crate::error::ApiError;
use crate::models::portfolio::{PatchPortfolio, PortfolioInput, PortfolioListQuery};

fn check_project_value(value: Option<f64>) -> Result<(), ApiError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(ApiError::Validation(
            "projectValue must be a non-negative number".to_string(),
        )),
        _ => Ok(()),
    }
}

fn check_required(input: &PortfolioInput) -> Result<(), ApiError> {
    super::require_fields(&[
        ("title", input.title.as_deref()),
        ("serviceCategory", input.service_category.as_deref()),
    ])?;
    check_project_value(input.project_value)
}

/// GET /api/content/portfolio — filtered, paginated list.
pub async fn get_portfolios(
    db: web::Data<DatabaseConnection>,
    query: web::Query<PortfolioListQuery>,
) -> Result<HttpResponse, ApiError> {
    let (items, pagination) = portfolio_db::list_portfolios(db.get_ref(), &query).await?;
    Ok(super::paged("portfolioItems", items, pagination))
}

/// POST /api/content/portfolio
pub async fn create_portfolio(
    db: web::Data<DatabaseConnection>,
    body: web::Json<PortfolioInput>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    check_required(&input)?;

    let created = portfolio_db::insert_portfolio(db.get_ref(), input).await?;
    Ok(HttpResponse::Created().json(created))
}

/// GET /api/content/portfolio/{id}
pub async fn get_portfolio(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let item = portfolio_db::get_portfolio_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Portfolio item {id} not found")))?;
    Ok(HttpResponse::Ok().json(item))
}

/// PUT /api/content/portfolio/{id}
pub async fn replace_portfolio(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<PortfolioInput>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    check_required(&input)?;

    let updated = portfolio_db::replace_portfolio(db.get_ref(), path.into_inner(), input).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// PATCH /api/content/portfolio/{id}
pub async fn patch_portfolio(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<PatchPortfolio>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    check_project_value(input.project_value.flatten())?;

    let updated = portfolio_db::patch_portfolio(db.get_ref(), path.into_inner(), input).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/content/portfolio/{id}
pub async fn delete_portfolio(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let result = portfolio_db::delete_portfolio(db.get_ref(), id).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound(format!("Portfolio item {id} not found")));
    }
    Ok(super::deleted("Portfolio item"))
}

/// GET /api/content/portfolio/stats
pub async fn get_stats(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, ApiError> {
    let stats = portfolio_db::portfolio_stats(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(stats))
}
