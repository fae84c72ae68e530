use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `page_contents` table, keyed logically by slug.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "page_contents")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub slug: String,
    pub title: String,
    /// HTML body.
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub meta_description: Option<String>,
    pub last_updated: DateTimeUtc,
    pub updated_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub meta_description: Option<String>,
}

/// Slugs are lower-case ASCII words separated by dashes.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= 100
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_rules() {
        assert!(is_valid_slug("about"));
        assert!(is_valid_slug("emergency-services-2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("About"));
        assert!(!is_valid_slug("-x"));
        assert!(!is_valid_slug("a/b"));
    }
}
