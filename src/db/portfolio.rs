use sea_orm::*;
use uuid::Uuid;

use super::stats;
use crate::models::portfolio::{self, Images, PatchPortfolio, PortfolioInput, PortfolioListQuery};
use crate::models::{PageRequest, Pagination, SortOrder, non_blank};

fn sort_column(sort_by: Option<&str>) -> portfolio::Column {
    match sort_by {
        Some("title") => portfolio::Column::Title,
        Some("serviceCategory") => portfolio::Column::ServiceCategory,
        Some("projectValue") => portfolio::Column::ProjectValue,
        Some("completedAt") => portfolio::Column::CompletedAt,
        Some("createdAt") => portfolio::Column::CreatedAt,
        _ => portfolio::Column::DisplayOrder,
    }
}

/// Next manual sort key: current maximum + 1, or 1 for an empty table.
pub async fn next_display_order<C: ConnectionTrait>(db: &C) -> Result<i32, DbErr> {
    let max: Option<Option<i32>> = portfolio::Entity::find()
        .select_only()
        .column_as(portfolio::Column::DisplayOrder.max(), "max_order")
        .into_tuple()
        .one(db)
        .await?;

    Ok(max.flatten().unwrap_or(0) + 1)
}

/// Insert a new portfolio item.
pub async fn insert_portfolio(
    db: &DatabaseConnection,
    input: PortfolioInput,
) -> Result<portfolio::Model, DbErr> {
    let txn = db.begin().await?;

    let display_order = match input.display_order {
        Some(order) => order,
        None => next_display_order(&txn).await?,
    };
    let now = chrono::Utc::now();

    let new_portfolio = portfolio::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(input.title.unwrap_or_default()),
        description: Set(non_blank(input.description)),
        service_category: Set(input.service_category.unwrap_or_default()),
        location: Set(non_blank(input.location)),
        images: Set(Images(input.images.unwrap_or_default())),
        project_value: Set(input.project_value),
        completed_at: Set(input.completed_at),
        is_visible: Set(input.is_visible.unwrap_or(true)),
        is_featured: Set(input.is_featured.unwrap_or(false)),
        display_order: Set(display_order),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let created = new_portfolio.insert(&txn).await?;
    txn.commit().await?;
    Ok(created)
}

pub async fn list_portfolios(
    db: &DatabaseConnection,
    query: &PortfolioListQuery,
) -> Result<(Vec<portfolio::Model>, Pagination), DbErr> {
    let mut select = portfolio::Entity::find();

    if let Some(search) = non_blank(query.search.clone()) {
        select = select.filter(
            Condition::any()
                .add(portfolio::Column::Title.contains(search.as_str()))
                .add(portfolio::Column::Description.contains(search.as_str()))
                .add(portfolio::Column::Location.contains(search.as_str())),
        );
    }
    if let Some(category) = non_blank(query.service_category.clone()) {
        select = select.filter(portfolio::Column::ServiceCategory.eq(category));
    }
    if let Some(visible) = query.is_visible {
        select = select.filter(portfolio::Column::IsVisible.eq(visible));
    }
    if let Some(featured) = query.is_featured {
        select = select.filter(portfolio::Column::IsFeatured.eq(featured));
    }

    let column = sort_column(query.sort_by.as_deref());
    let default_order = if matches!(column, portfolio::Column::DisplayOrder) {
        SortOrder::Asc
    } else {
        SortOrder::Desc
    };
    let order: Order = query.sort_order.unwrap_or(default_order).into();
    select = select
        .order_by(column, order)
        .order_by_asc(portfolio::Column::CreatedAt);

    super::fetch_page(db, select, PageRequest::new(query.page, query.limit)).await
}

/// Visible items for the public site.
pub async fn get_public_portfolios(
    db: &DatabaseConnection,
    category: Option<String>,
) -> Result<Vec<portfolio::Model>, DbErr> {
    let mut select = portfolio::Entity::find().filter(portfolio::Column::IsVisible.eq(true));
    if let Some(category) = non_blank(category) {
        select = select.filter(portfolio::Column::ServiceCategory.eq(category));
    }

    select
        .order_by_desc(portfolio::Column::IsFeatured)
        .order_by_asc(portfolio::Column::DisplayOrder)
        .all(db)
        .await
}

/// Fetch a single portfolio item by ID.
pub async fn get_portfolio_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<portfolio::Model>, DbErr> {
    portfolio::Entity::find_by_id(id).one(db).await
}

/// Full overwrite (PUT).
pub async fn replace_portfolio(
    db: &DatabaseConnection,
    id: Uuid,
    input: PortfolioInput,
) -> Result<portfolio::Model, DbErr> {
    let item = portfolio::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound(format!("Portfolio item {id} not found")))?;

    let display_order = input.display_order.unwrap_or(item.display_order);
    let mut active: portfolio::ActiveModel = item.into();

    active.title = Set(input.title.unwrap_or_default());
    active.description = Set(non_blank(input.description));
    active.service_category = Set(input.service_category.unwrap_or_default());
    active.location = Set(non_blank(input.location));
    active.images = Set(Images(input.images.unwrap_or_default()));
    active.project_value = Set(input.project_value);
    active.completed_at = Set(input.completed_at);
    active.is_visible = Set(input.is_visible.unwrap_or(true));
    active.is_featured = Set(input.is_featured.unwrap_or(false));
    active.display_order = Set(display_order);
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

/// Partial update (PATCH).
pub async fn patch_portfolio(
    db: &DatabaseConnection,
    id: Uuid,
    input: PatchPortfolio,
) -> Result<portfolio::Model, DbErr> {
    let item = portfolio::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound(format!("Portfolio item {id} not found")))?;

    let mut active: portfolio::ActiveModel = item.into();

    if let Some(title) = non_blank(input.title) {
        active.title = Set(title);
    }
    if let Some(description) = input.description {
        active.description = Set(non_blank(description));
    }
    if let Some(service_category) = non_blank(input.service_category) {
        active.service_category = Set(service_category);
    }
    if let Some(location) = input.location {
        active.location = Set(non_blank(location));
    }
    if let Some(images) = input.images {
        active.images = Set(Images(images));
    }
    if let Some(project_value) = input.project_value {
        active.project_value = Set(project_value);
    }
    if let Some(completed_at) = input.completed_at {
        active.completed_at = Set(completed_at);
    }
    if let Some(is_visible) = input.is_visible {
        active.is_visible = Set(is_visible);
    }
    if let Some(is_featured) = input.is_featured {
        active.is_featured = Set(is_featured);
    }
    if let Some(display_order) = input.display_order {
        active.display_order = Set(display_order);
    }
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

/// Delete a portfolio item by ID.
pub async fn delete_portfolio(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    portfolio::Entity::delete_by_id(id).exec(db).await
}

pub async fn portfolio_stats(db: &DatabaseConnection) -> Result<serde_json::Value, DbErr> {
    let total = portfolio::Entity::find().count(db).await?;
    let visible = portfolio::Entity::find()
        .filter(portfolio::Column::IsVisible.eq(true))
        .count(db)
        .await?;
    let featured = portfolio::Entity::find()
        .filter(portfolio::Column::IsFeatured.eq(true))
        .count(db)
        .await?;

    let total_value: Option<Option<f64>> = portfolio::Entity::find()
        .select_only()
        .column_as(portfolio::Column::ProjectValue.sum(), "total_value")
        .into_tuple()
        .one(db)
        .await?;

    let by_category =
        stats::grouped_counts::<portfolio::Entity, _>(db, portfolio::Column::ServiceCategory)
            .await?;

    Ok(serde_json::json!({
        "total": total,
        "visible": visible,
        "featured": featured,
        "totalProjectValue": total_value.flatten().unwrap_or(0.0),
        "byCategory": stats::distribution(by_category, "category"),
    }))
}
