use std::collections::BTreeMap;

use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use uuid::Uuid;

use crate::models::settings::{self, SettingListQuery, SettingWrite};
use crate::models::{PageRequest, Pagination, non_blank};

/// Insert or update a setting by key. Returns the row and whether it was created.
///
/// The write is a single insert-on-conflict-update, so two first writers of
/// the same key both succeed. `description` and `isPublic` are only
/// overwritten when present in the input.
pub async fn upsert_setting(
    db: &DatabaseConnection,
    input: SettingWrite,
) -> Result<(settings::Model, bool), DbErr> {
    let txn = db.begin().await?;
    let now = chrono::Utc::now();

    let created = settings::Entity::find()
        .filter(settings::Column::Key.eq(input.key.as_str()))
        .one(&txn)
        .await?
        .is_none();

    let mut update_columns = vec![
        settings::Column::Value,
        settings::Column::UpdatedBy,
        settings::Column::UpdatedAt,
    ];
    if input.description.is_some() {
        update_columns.push(settings::Column::Description);
    }
    if input.is_public.is_some() {
        update_columns.push(settings::Column::IsPublic);
    }

    let key = input.key.clone();
    let row = settings::ActiveModel {
        id: Set(Uuid::new_v4()),
        key: Set(input.key),
        value: Set(input.value),
        description: Set(non_blank(input.description)),
        is_public: Set(input.is_public.unwrap_or(false)),
        updated_by: Set(input.updated_by),
        created_at: Set(now),
        updated_at: Set(now),
    };

    settings::Entity::insert(row)
        .on_conflict(
            OnConflict::column(settings::Column::Key)
                .update_columns(update_columns)
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

    let saved = settings::Entity::find()
        .filter(settings::Column::Key.eq(key.as_str()))
        .one(&txn)
        .await?
        .ok_or(DbErr::RecordNotFound(format!("Setting {key} not found")))?;

    txn.commit().await?;
    Ok((saved, created))
}

pub async fn list_settings(
    db: &DatabaseConnection,
    query: &SettingListQuery,
) -> Result<(Vec<settings::Model>, Pagination), DbErr> {
    let mut select = settings::Entity::find();

    if let Some(search) = non_blank(query.search.clone()) {
        select = select.filter(
            Condition::any()
                .add(settings::Column::Key.contains(search.as_str()))
                .add(settings::Column::Description.contains(search.as_str())),
        );
    }
    if let Some(is_public) = query.is_public {
        select = select.filter(settings::Column::IsPublic.eq(is_public));
    }

    let select = select.order_by_asc(settings::Column::Key);
    super::fetch_page(db, select, PageRequest::new(query.page, query.limit)).await
}

/// Fetch a single setting by its key.
pub async fn get_setting_by_key(
    db: &DatabaseConnection,
    key: &str,
) -> Result<Option<settings::Model>, DbErr> {
    settings::Entity::find()
        .filter(settings::Column::Key.eq(key))
        .one(db)
        .await
}

/// Delete a setting by key.
pub async fn delete_setting(db: &DatabaseConnection, key: &str) -> Result<DeleteResult, DbErr> {
    settings::Entity::delete_many()
        .filter(settings::Column::Key.eq(key))
        .exec(db)
        .await
}

/// Public settings as a `key -> value` map.
pub async fn get_public_settings(
    db: &DatabaseConnection,
) -> Result<BTreeMap<String, String>, DbErr> {
    let rows = settings::Entity::find()
        .filter(settings::Column::IsPublic.eq(true))
        .order_by_asc(settings::Column::Key)
        .all(db)
        .await?;

    Ok(rows.into_iter().map(|s| (s.key, s.value)).collect())
}
