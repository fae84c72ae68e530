use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Images(pub Vec<String>);

/// SeaORM entity for the `portfolio_items` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "portfolio_items")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub service_category: String,
    pub location: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub images: Images,
    #[sea_orm(column_type = "Double", nullable)]
    pub project_value: Option<f64>,
    pub completed_at: Option<DateTimeUtc>,
    pub is_visible: bool,
    pub is_featured: bool,
    pub display_order: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub service_category: Option<String>,
    pub location: Option<String>,
    pub images: Option<Vec<String>>,
    pub project_value: Option<f64>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub is_visible: Option<bool>,
    pub is_featured: Option<bool>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchPortfolio {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub description: Option<Option<String>>,
    pub service_category: Option<String>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub location: Option<Option<String>>,
    pub images: Option<Vec<String>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub project_value: Option<Option<f64>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub completed_at: Option<Option<chrono::DateTime<chrono::Utc>>>,
    pub is_visible: Option<bool>,
    pub is_featured: Option<bool>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub service_category: Option<String>,
    pub is_visible: Option<bool>,
    pub is_featured: Option<bool>,
    pub sort_by: Option<String>,
    pub sort_order: Option<super::SortOrder>,
}
