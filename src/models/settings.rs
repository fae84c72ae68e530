use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `settings` key-value table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "settings")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub key: String,
    #[sea_orm(column_type = "Text")]
    pub value: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub updated_by: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Body of `POST /api/settings`. Non-string values are stored as JSON text.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertSetting {
    pub key: Option<String>,
    pub value: Option<serde_json::Value>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

/// Validated upsert, ready to persist.
#[derive(Debug, Clone)]
pub struct SettingWrite {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub updated_by: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub is_public: Option<bool>,
}

/// Render an incoming setting value as stored text.
pub fn value_to_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_are_stored_verbatim_and_others_as_json() {
        assert_eq!(value_to_text(serde_json::json!("blue")), "blue");
        assert_eq!(value_to_text(serde_json::json!(true)), "true");
        assert_eq!(value_to_text(serde_json::json!({"a": 1})), r#"{"a":1}"#);
    }
}
