use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use super::stats::{self, TimeWindows};
use crate::models::testimonials::{
    self, PatchTestimonial, ReorderItem, TestimonialInput, TestimonialListQuery,
};
use crate::models::{BatchItemResult, PageRequest, Pagination, SortOrder, non_blank};

fn sort_column(sort_by: Option<&str>) -> testimonials::Column {
    match sort_by {
        Some("customerName") => testimonials::Column::CustomerName,
        Some("rating") => testimonials::Column::Rating,
        Some("createdAt") => testimonials::Column::CreatedAt,
        Some("updatedAt") => testimonials::Column::UpdatedAt,
        _ => testimonials::Column::DisplayOrder,
    }
}

/// Next manual sort key: current maximum + 1, or 1 for an empty table.
pub async fn next_display_order<C: ConnectionTrait>(db: &C) -> Result<i32, DbErr> {
    let max: Option<Option<i32>> = testimonials::Entity::find()
        .select_only()
        .column_as(testimonials::Column::DisplayOrder.max(), "max_order")
        .into_tuple()
        .one(db)
        .await?;

    Ok(max.flatten().unwrap_or(0) + 1)
}

/// Insert a testimonial. Callers have already checked the required fields.
pub async fn insert_testimonial(
    db: &DatabaseConnection,
    input: TestimonialInput,
) -> Result<testimonials::Model, DbErr> {
    let txn = db.begin().await?;

    let display_order = match input.display_order {
        Some(order) => order,
        None => next_display_order(&txn).await?,
    };
    let now = chrono::Utc::now();

    let new_testimonial = testimonials::ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_name: Set(input.customer_name.unwrap_or_default()),
        customer_title: Set(non_blank(input.customer_title)),
        customer_company: Set(non_blank(input.customer_company)),
        customer_photo: Set(non_blank(input.customer_photo)),
        testimonial_text: Set(input.testimonial_text.unwrap_or_default()),
        rating: Set(input.rating.unwrap_or(testimonials::MAX_RATING)),
        project_type: Set(non_blank(input.project_type)),
        is_visible: Set(input.is_visible.unwrap_or(true)),
        is_featured: Set(input.is_featured.unwrap_or(false)),
        display_order: Set(display_order),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let created = new_testimonial.insert(&txn).await?;
    txn.commit().await?;
    Ok(created)
}

/// Filtered, sorted, paginated listing for the admin screen.
pub async fn list_testimonials(
    db: &DatabaseConnection,
    query: &TestimonialListQuery,
) -> Result<(Vec<testimonials::Model>, Pagination), DbErr> {
    let mut select = testimonials::Entity::find();

    if let Some(search) = non_blank(query.search.clone()) {
        select = select.filter(
            Condition::any()
                .add(testimonials::Column::CustomerName.contains(search.as_str()))
                .add(testimonials::Column::CustomerCompany.contains(search.as_str()))
                .add(testimonials::Column::TestimonialText.contains(search.as_str())),
        );
    }
    if let Some(visible) = query.is_visible {
        select = select.filter(testimonials::Column::IsVisible.eq(visible));
    }
    if let Some(featured) = query.is_featured {
        select = select.filter(testimonials::Column::IsFeatured.eq(featured));
    }
    if let Some(project_type) = non_blank(query.project_type.clone()) {
        select = select.filter(testimonials::Column::ProjectType.eq(project_type));
    }
    if let Some(rating) = query.rating {
        select = select.filter(testimonials::Column::Rating.eq(rating));
    }

    let column = sort_column(query.sort_by.as_deref());
    let default_order = if matches!(column, testimonials::Column::DisplayOrder) {
        SortOrder::Asc
    } else {
        SortOrder::Desc
    };
    let order: Order = query.sort_order.unwrap_or(default_order).into();
    select = select
        .order_by(column, order)
        .order_by_asc(testimonials::Column::CreatedAt);

    super::fetch_page(db, select, PageRequest::new(query.page, query.limit)).await
}

/// Visible testimonials for the public site: featured first, then manual order.
pub async fn get_public_testimonials(
    db: &DatabaseConnection,
) -> Result<Vec<testimonials::Model>, DbErr> {
    testimonials::Entity::find()
        .filter(testimonials::Column::IsVisible.eq(true))
        .order_by_desc(testimonials::Column::IsFeatured)
        .order_by_asc(testimonials::Column::DisplayOrder)
        .all(db)
        .await
}

/// Fetch a single testimonial by ID.
pub async fn get_testimonial_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<testimonials::Model>, DbErr> {
    testimonials::Entity::find_by_id(id).one(db).await
}

/// Full overwrite (PUT). Unspecified optional fields are cleared; the display
/// order is kept unless supplied.
pub async fn replace_testimonial(
    db: &DatabaseConnection,
    id: Uuid,
    input: TestimonialInput,
) -> Result<testimonials::Model, DbErr> {
    let item = testimonials::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound(format!("Testimonial {id} not found")))?;

    let display_order = input.display_order.unwrap_or(item.display_order);
    let mut active: testimonials::ActiveModel = item.into();

    active.customer_name = Set(input.customer_name.unwrap_or_default());
    active.customer_title = Set(non_blank(input.customer_title));
    active.customer_company = Set(non_blank(input.customer_company));
    active.customer_photo = Set(non_blank(input.customer_photo));
    active.testimonial_text = Set(input.testimonial_text.unwrap_or_default());
    active.rating = Set(input.rating.unwrap_or(testimonials::MAX_RATING));
    active.project_type = Set(non_blank(input.project_type));
    active.is_visible = Set(input.is_visible.unwrap_or(true));
    active.is_featured = Set(input.is_featured.unwrap_or(false));
    active.display_order = Set(display_order);
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

/// Partial update (PATCH): only fields present in the body change.
pub async fn patch_testimonial(
    db: &DatabaseConnection,
    id: Uuid,
    input: PatchTestimonial,
) -> Result<testimonials::Model, DbErr> {
    let item = testimonials::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound(format!("Testimonial {id} not found")))?;

    let mut active: testimonials::ActiveModel = item.into();

    if let Some(customer_name) = input.customer_name {
        active.customer_name = Set(customer_name);
    }
    if let Some(customer_title) = input.customer_title {
        active.customer_title = Set(non_blank(customer_title));
    }
    if let Some(customer_company) = input.customer_company {
        active.customer_company = Set(non_blank(customer_company));
    }
    if let Some(customer_photo) = input.customer_photo {
        active.customer_photo = Set(non_blank(customer_photo));
    }
    if let Some(testimonial_text) = input.testimonial_text {
        active.testimonial_text = Set(testimonial_text);
    }
    if let Some(rating) = input.rating {
        active.rating = Set(rating);
    }
    if let Some(project_type) = input.project_type {
        active.project_type = Set(non_blank(project_type));
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

/// Delete a testimonial by ID.
pub async fn delete_testimonial(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    testimonials::Entity::delete_by_id(id).exec(db).await
}

/// Apply every `{id, displayOrder}` pair in one transaction.
///
/// If any id does not resolve, nothing is committed; the per-item results say
/// which ones failed.
pub async fn reorder_testimonials(
    db: &DatabaseConnection,
    items: &[ReorderItem],
) -> Result<Vec<BatchItemResult>, DbErr> {
    let txn = db.begin().await?;
    let now = chrono::Utc::now();
    let mut results = Vec::with_capacity(items.len());

    for item in items {
        let outcome = testimonials::Entity::update_many()
            .col_expr(
                testimonials::Column::DisplayOrder,
                Expr::value(item.display_order),
            )
            .col_expr(testimonials::Column::UpdatedAt, Expr::value(now))
            .filter(testimonials::Column::Id.eq(item.id))
            .exec(&txn)
            .await?;

        if outcome.rows_affected > 0 {
            results.push(BatchItemResult::ok(item.id));
        } else {
            results.push(BatchItemResult::failed(item.id, "Testimonial not found"));
        }
    }

    if results.iter().all(|r| r.success) {
        txn.commit().await?;
    } else {
        txn.rollback().await?;
    }

    Ok(results)
}

pub async fn testimonial_stats(db: &DatabaseConnection) -> Result<serde_json::Value, DbErr> {
    let windows = TimeWindows::now();

    let total = testimonials::Entity::find().count(db).await?;
    let visible = testimonials::Entity::find()
        .filter(testimonials::Column::IsVisible.eq(true))
        .count(db)
        .await?;
    let featured = testimonials::Entity::find()
        .filter(testimonials::Column::IsFeatured.eq(true))
        .count(db)
        .await?;
    let new_this_month = testimonials::Entity::find()
        .filter(testimonials::Column::CreatedAt.gte(windows.month_start))
        .count(db)
        .await?;

    let (rating_sum, rating_count) = rating_totals(db, false).await?;
    let by_project_type =
        stats::grouped_counts::<testimonials::Entity, _>(db, testimonials::Column::ProjectType)
            .await?;

    let by_rating: Vec<(Option<i32>, i64)> = testimonials::Entity::find()
        .select_only()
        .column(testimonials::Column::Rating)
        .column_as(testimonials::Column::Rating.count(), "count")
        .group_by(testimonials::Column::Rating)
        .into_tuple()
        .all(db)
        .await?;
    let mut rating_map = serde_json::Map::new();
    for star in testimonials::MIN_RATING..=testimonials::MAX_RATING {
        let count = by_rating
            .iter()
            .find(|(r, _)| *r == Some(star))
            .map(|(_, c)| *c)
            .unwrap_or(0);
        rating_map.insert(star.to_string(), serde_json::json!(count));
    }

    Ok(serde_json::json!({
        "total": total,
        "visible": visible,
        "hidden": total.saturating_sub(visible),
        "featured": featured,
        "averageRating": stats::average(rating_sum, rating_count),
        "newThisMonth": new_this_month,
        "byProjectType": stats::distribution(by_project_type, "projectType"),
        "byRating": rating_map,
    }))
}

/// `(sum, count)` of ratings, optionally restricted to visible testimonials.
pub async fn rating_totals<C: ConnectionTrait>(
    db: &C,
    visible_only: bool,
) -> Result<(i64, u64), DbErr> {
    let mut select = testimonials::Entity::find()
        .select_only()
        .column_as(testimonials::Column::Rating.sum(), "rating_sum")
        .column_as(testimonials::Column::Rating.count(), "rating_count");
    if visible_only {
        select = select.filter(testimonials::Column::IsVisible.eq(true));
    }

    let row: Option<(Option<i64>, i64)> = select.into_tuple().one(db).await?;
    let (sum, count) = row.unwrap_or((None, 0));
    Ok((sum.unwrap_or(0), u64::try_from(count).unwrap_or(0)))
}
