use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormType {
    #[sea_orm(string_value = "CONTACT")]
    Contact,
    #[sea_orm(string_value = "SERVICE_INQUIRY")]
    ServiceInquiry,
    #[sea_orm(string_value = "QUOTE_REQUEST")]
    QuoteRequest,
}

/// Inbox lifecycle: NEW → IN_PROGRESS → RESPONDED / COMPLETED, or ARCHIVED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormStatus {
    #[sea_orm(string_value = "NEW")]
    New,
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "RESPONDED")]
    Responded,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "ARCHIVED")]
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    #[sea_orm(string_value = "LOW")]
    Low,
    #[sea_orm(string_value = "MEDIUM")]
    Medium,
    #[sea_orm(string_value = "HIGH")]
    High,
    #[sea_orm(string_value = "URGENT")]
    Urgent,
}

/// Who sent the inquiry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub preferred_contact: Option<String>,
}

impl CustomerInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// What they asked for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    #[serde(default)]
    pub service: Option<String>,
    pub message: String,
    #[serde(default)]
    pub emergency: bool,
    #[serde(default)]
    pub consent: bool,
    #[serde(default)]
    pub source: Option<String>,
    /// Free-form extras (quote details and the like).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Tags(pub Vec<String>);

/// SeaORM entity for the `form_submissions` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "form_submissions")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub form_type: FormType,
    pub status: FormStatus,
    pub priority: Priority,
    /// Denormalized from `customer_info` for search.
    pub customer_name: String,
    pub customer_email: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub customer_info: CustomerInfo,
    #[sea_orm(column_type = "JsonBinary")]
    pub form_data: FormData,
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: Tags,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub assigned_to_id: Option<Uuid>,
    pub submitted_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::form_responses::Entity")]
    Responses,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AssignedToId",
        to = "super::users::Column::Id"
    )]
    AssignedTo,
}

impl Related<super::form_responses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Responses.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssignedTo.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Normalized intake record, built by the public contact form.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub form_type: FormType,
    pub priority: Priority,
    pub customer_info: CustomerInfo,
    pub form_data: FormData,
    pub tags: Vec<String>,
}

/// Body of `PATCH /api/forms/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubmission {
    pub status: Option<FormStatus>,
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub notes: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub assigned_to_id: Option<Option<Uuid>>,
}

/// The subset of fields a bulk update may touch.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkChanges {
    pub status: Option<FormStatus>,
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub assigned_to_id: Option<Option<Uuid>>,
}

impl BulkChanges {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.priority.is_none() && self.assigned_to_id.is_none()
    }
}

/// Body of `PATCH /api/forms/bulk`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateRequest {
    #[serde(default)]
    pub ids: Vec<Uuid>,
    #[serde(default)]
    pub updates: BulkChanges,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub status: Option<FormStatus>,
    pub priority: Option<Priority>,
    #[serde(rename = "type")]
    pub form_type: Option<FormType>,
    pub assigned_to_id: Option<Uuid>,
    pub sort_by: Option<String>,
    pub sort_order: Option<super::SortOrder>,
}
