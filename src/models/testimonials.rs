use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `testimonials` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "testimonials")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_name: String,
    pub customer_title: Option<String>,
    pub customer_company: Option<String>,
    pub customer_photo: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub testimonial_text: String,
    pub rating: i32,
    pub project_type: Option<String>,
    pub is_visible: bool,
    pub is_featured: bool,
    /// Manual sort key; not unique.
    pub display_order: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Body of `POST` and `PUT`. PUT overwrites every field listed here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialInput {
    pub customer_name: Option<String>,
    pub customer_title: Option<String>,
    pub customer_company: Option<String>,
    pub customer_photo: Option<String>,
    pub testimonial_text: Option<String>,
    pub rating: Option<i32>,
    pub project_type: Option<String>,
    pub is_visible: Option<bool>,
    pub is_featured: Option<bool>,
    pub display_order: Option<i32>,
}

/// Body of `PATCH`: only present fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchTestimonial {
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub customer_title: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub customer_company: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub customer_photo: Option<Option<String>>,
    pub testimonial_text: Option<String>,
    pub rating: Option<i32>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub project_type: Option<Option<String>>,
    pub is_visible: Option<bool>,
    pub is_featured: Option<bool>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReorderItem {
    pub id: Uuid,
    pub display_order: i32,
}

/// Body of `PUT /reorder`; accepts `{testimonials: [...]}` or a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ReorderRequest {
    Wrapped { testimonials: Vec<ReorderItem> },
    Bare(Vec<ReorderItem>),
}

impl ReorderRequest {
    pub fn into_items(self) -> Vec<ReorderItem> {
        match self {
            Self::Wrapped { testimonials } => testimonials,
            Self::Bare(items) => items,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub is_visible: Option<bool>,
    pub is_featured: Option<bool>,
    pub project_type: Option<String>,
    pub rating: Option<i32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<super::SortOrder>,
}
