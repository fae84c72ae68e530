use sea_orm::*;
use uuid::Uuid;

use crate::models::non_blank;
use crate::models::page_contents::{self, PageInput};

/// Fetch a page by slug.
pub async fn get_page_by_slug(
    db: &DatabaseConnection,
    slug: &str,
) -> Result<Option<page_contents::Model>, DbErr> {
    page_contents::Entity::find()
        .filter(page_contents::Column::Slug.eq(slug))
        .one(db)
        .await
}

pub async fn list_pages(db: &DatabaseConnection) -> Result<Vec<page_contents::Model>, DbErr> {
    page_contents::Entity::find()
        .order_by_asc(page_contents::Column::Slug)
        .all(db)
        .await
}

/// Create or replace the page at `slug`. Returns the row and whether it was created.
pub async fn upsert_page(
    db: &DatabaseConnection,
    slug: &str,
    input: PageInput,
    updated_by: Option<String>,
) -> Result<(page_contents::Model, bool), DbErr> {
    let txn = db.begin().await?;
    let now = chrono::Utc::now();

    let existing = page_contents::Entity::find()
        .filter(page_contents::Column::Slug.eq(slug))
        .one(&txn)
        .await?;

    let (saved, created) = match existing {
        Some(page) => {
            let mut active: page_contents::ActiveModel = page.into();
            active.title = Set(input.title.unwrap_or_default());
            active.content = Set(input.content.unwrap_or_default());
            active.meta_description = Set(non_blank(input.meta_description));
            active.last_updated = Set(now);
            active.updated_by = Set(updated_by);
            (active.update(&txn).await?, false)
        }
        None => {
            let new_page = page_contents::ActiveModel {
                id: Set(Uuid::new_v4()),
                slug: Set(slug.to_string()),
                title: Set(input.title.unwrap_or_default()),
                content: Set(input.content.unwrap_or_default()),
                meta_description: Set(non_blank(input.meta_description)),
                last_updated: Set(now),
                updated_by: Set(updated_by),
            };
            (new_page.insert(&txn).await?, true)
        }
    };

    txn.commit().await?;
    Ok((saved, created))
}

/// Delete a page by slug.
pub async fn delete_page(db: &DatabaseConnection, slug: &str) -> Result<DeleteResult, DbErr> {
    page_contents::Entity::delete_many()
        .filter(page_contents::Column::Slug.eq(slug))
        .exec(db)
        .await
}
