use sea_orm::*;
use uuid::Uuid;

use super::stats::{self, TimeWindows};
use crate::models::customers::{self, CustomerInput, CustomerListQuery, CustomerType, PatchCustomer};
use crate::models::{PageRequest, Pagination, SortOrder, non_blank};

fn sort_column(sort_by: Option<&str>) -> customers::Column {
    match sort_by {
        Some("firstName") => customers::Column::FirstName,
        Some("lastName") => customers::Column::LastName,
        Some("email") => customers::Column::Email,
        Some("company") => customers::Column::Company,
        Some("updatedAt") => customers::Column::UpdatedAt,
        _ => customers::Column::CreatedAt,
    }
}

/// Insert a new customer. Callers have already checked the required fields.
pub async fn insert_customer(
    db: &DatabaseConnection,
    input: CustomerInput,
) -> Result<customers::Model, DbErr> {
    let now = chrono::Utc::now();

    let new_customer = customers::ActiveModel {
        id: Set(Uuid::new_v4()),
        first_name: Set(input.first_name.unwrap_or_default().trim().to_string()),
        last_name: Set(input.last_name.unwrap_or_default().trim().to_string()),
        email: Set(input.email.unwrap_or_default().trim().to_lowercase()),
        phone: Set(non_blank(input.phone)),
        company: Set(non_blank(input.company)),
        address: Set(non_blank(input.address)),
        city: Set(non_blank(input.city)),
        customer_type: Set(input.customer_type.unwrap_or(CustomerType::Residential)),
        source: Set(non_blank(input.source)),
        notes: Set(non_blank(input.notes)),
        is_active: Set(input.is_active.unwrap_or(true)),
        created_at: Set(now),
        updated_at: Set(now),
    };

    new_customer.insert(db).await
}

pub async fn list_customers(
    db: &DatabaseConnection,
    query: &CustomerListQuery,
) -> Result<(Vec<customers::Model>, Pagination), DbErr> {
    let mut select = customers::Entity::find();

    if let Some(search) = non_blank(query.search.clone()) {
        select = select.filter(
            Condition::any()
                .add(customers::Column::FirstName.contains(search.as_str()))
                .add(customers::Column::LastName.contains(search.as_str()))
                .add(customers::Column::Email.contains(search.as_str()))
                .add(customers::Column::Phone.contains(search.as_str()))
                .add(customers::Column::Company.contains(search.as_str())),
        );
    }
    if let Some(customer_type) = query.customer_type {
        select = select.filter(customers::Column::CustomerType.eq(customer_type));
    }
    if let Some(active) = query.is_active {
        select = select.filter(customers::Column::IsActive.eq(active));
    }
    if let Some(source) = non_blank(query.source.clone()) {
        select = select.filter(customers::Column::Source.eq(source));
    }

    let order: Order = query.sort_order.unwrap_or(SortOrder::Desc).into();
    select = select
        .order_by(sort_column(query.sort_by.as_deref()), order)
        .order_by_asc(customers::Column::Id);

    super::fetch_page(db, select, PageRequest::new(query.page, query.limit)).await
}

/// Fetch a single customer by ID.
pub async fn get_customer_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<customers::Model>, DbErr> {
    customers::Entity::find_by_id(id).one(db).await
}

/// Full overwrite (PUT).
pub async fn replace_customer(
    db: &DatabaseConnection,
    id: Uuid,
    input: CustomerInput,
) -> Result<customers::Model, DbErr> {
    let customer = customers::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound(format!("Customer {id} not found")))?;

    let mut active: customers::ActiveModel = customer.into();

    active.first_name = Set(input.first_name.unwrap_or_default().trim().to_string());
    active.last_name = Set(input.last_name.unwrap_or_default().trim().to_string());
    active.email = Set(input.email.unwrap_or_default().trim().to_lowercase());
    active.phone = Set(non_blank(input.phone));
    active.company = Set(non_blank(input.company));
    active.address = Set(non_blank(input.address));
    active.city = Set(non_blank(input.city));
    active.customer_type = Set(input.customer_type.unwrap_or(CustomerType::Residential));
    active.source = Set(non_blank(input.source));
    active.notes = Set(non_blank(input.notes));
    active.is_active = Set(input.is_active.unwrap_or(true));
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

/// Partial update (PATCH).
pub async fn patch_customer(
    db: &DatabaseConnection,
    id: Uuid,
    input: PatchCustomer,
) -> Result<customers::Model, DbErr> {
    let customer = customers::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound(format!("Customer {id} not found")))?;

    let mut active: customers::ActiveModel = customer.into();

    if let Some(first_name) = non_blank(input.first_name) {
        active.first_name = Set(first_name);
    }
    if let Some(last_name) = non_blank(input.last_name) {
        active.last_name = Set(last_name);
    }
    if let Some(email) = non_blank(input.email) {
        active.email = Set(email.to_lowercase());
    }
    if let Some(phone) = input.phone {
        active.phone = Set(non_blank(phone));
    }
    if let Some(company) = input.company {
        active.company = Set(non_blank(company));
    }
    if let Some(address) = input.address {
        active.address = Set(non_blank(address));
    }
    if let Some(city) = input.city {
        active.city = Set(non_blank(city));
    }
    if let Some(customer_type) = input.customer_type {
        active.customer_type = Set(customer_type);
    }
    if let Some(source) = input.source {
        active.source = Set(non_blank(source));
    }
    if let Some(notes) = input.notes {
        active.notes = Set(non_blank(notes));
    }
    if let Some(is_active) = input.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

/// Delete a customer by ID.
pub async fn delete_customer(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    customers::Entity::delete_by_id(id).exec(db).await
}

pub async fn customer_stats(db: &DatabaseConnection) -> Result<serde_json::Value, DbErr> {
    let windows = TimeWindows::now();

    let total = customers::Entity::find().count(db).await?;
    let active = customers::Entity::find()
        .filter(customers::Column::IsActive.eq(true))
        .count(db)
        .await?;
    let new_this_month = customers::Entity::find()
        .filter(customers::Column::CreatedAt.gte(windows.month_start))
        .count(db)
        .await?;
    let new_this_year = customers::Entity::find()
        .filter(customers::Column::CreatedAt.gte(windows.year_start))
        .count(db)
        .await?;

    let by_type =
        stats::grouped_counts::<customers::Entity, _>(db, customers::Column::CustomerType).await?;
    let by_source =
        stats::grouped_counts::<customers::Entity, _>(db, customers::Column::Source).await?;

    Ok(serde_json::json!({
        "total": total,
        "active": active,
        "inactive": total.saturating_sub(active),
        "byType": stats::enum_breakdown::<CustomerType>(&by_type),
        "bySource": stats::distribution(by_source, "source"),
        "newThisMonth": new_this_month,
        "newThisYear": new_this_year,
    }))
}
