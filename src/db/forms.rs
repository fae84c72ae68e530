use sea_orm::*;
use uuid::Uuid;

use super::stats::{self, TimeWindows};
use crate::models::form_responses::{self, Attachments, NewResponse};
use crate::models::form_submissions::{
    self, BulkChanges, FormStatus, FormType, NewSubmission, Priority, SubmissionListQuery, Tags,
    UpdateSubmission,
};
use crate::models::{BatchItemResult, PageRequest, Pagination, SortOrder, non_blank};

fn sort_column(sort_by: Option<&str>) -> form_submissions::Column {
    match sort_by {
        Some("status") => form_submissions::Column::Status,
        Some("priority") => form_submissions::Column::Priority,
        Some("type") => form_submissions::Column::FormType,
        Some("customerName") => form_submissions::Column::CustomerName,
        Some("updatedAt") => form_submissions::Column::UpdatedAt,
        _ => form_submissions::Column::SubmittedAt,
    }
}

/// Persist a normalized intake record as a NEW submission.
pub async fn insert_submission(
    db: &DatabaseConnection,
    input: NewSubmission,
) -> Result<form_submissions::Model, DbErr> {
    let now = chrono::Utc::now();

    let new_submission = form_submissions::ActiveModel {
        id: Set(Uuid::new_v4()),
        form_type: Set(input.form_type),
        status: Set(FormStatus::New),
        priority: Set(input.priority),
        customer_name: Set(input.customer_info.full_name()),
        customer_email: Set(input.customer_info.email.clone()),
        customer_info: Set(input.customer_info),
        form_data: Set(input.form_data),
        tags: Set(Tags(input.tags)),
        notes: Set(None),
        assigned_to_id: Set(None),
        submitted_at: Set(now),
        updated_at: Set(now),
    };

    new_submission.insert(db).await
}

pub async fn list_submissions(
    db: &DatabaseConnection,
    query: &SubmissionListQuery,
) -> Result<(Vec<form_submissions::Model>, Pagination), DbErr> {
    let mut select = form_submissions::Entity::find();

    if let Some(search) = non_blank(query.search.clone()) {
        select = select.filter(
            Condition::any()
                .add(form_submissions::Column::CustomerName.contains(search.as_str()))
                .add(form_submissions::Column::CustomerEmail.contains(search.as_str()))
                .add(form_submissions::Column::Notes.contains(search.as_str())),
        );
    }
    if let Some(status) = query.status {
        select = select.filter(form_submissions::Column::Status.eq(status));
    }
    if let Some(priority) = query.priority {
        select = select.filter(form_submissions::Column::Priority.eq(priority));
    }
    if let Some(form_type) = query.form_type {
        select = select.filter(form_submissions::Column::FormType.eq(form_type));
    }
    if let Some(assignee) = query.assigned_to_id {
        select = select.filter(form_submissions::Column::AssignedToId.eq(assignee));
    }

    let order: Order = query.sort_order.unwrap_or(SortOrder::Desc).into();
    select = select
        .order_by(sort_column(query.sort_by.as_deref()), order)
        .order_by_desc(form_submissions::Column::SubmittedAt);

    super::fetch_page(db, select, PageRequest::new(query.page, query.limit)).await
}

/// Fetch a single submission by ID.
pub async fn get_submission_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<form_submissions::Model>, DbErr> {
    form_submissions::Entity::find_by_id(id).one(db).await
}

/// Newest submissions first.
pub async fn get_recent_submissions(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<form_submissions::Model>, DbErr> {
    form_submissions::Entity::find()
        .order_by_desc(form_submissions::Column::SubmittedAt)
        .limit(limit)
        .all(db)
        .await
}

/// Merge the fields present in `input` into an existing submission.
pub async fn update_submission(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateSubmission,
) -> Result<form_submissions::Model, DbErr> {
    let submission = form_submissions::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound(format!("Form submission {id} not found")))?;

    let mut active: form_submissions::ActiveModel = submission.into();

    if let Some(status) = input.status {
        active.status = Set(status);
    }
    if let Some(priority) = input.priority {
        active.priority = Set(priority);
    }
    if let Some(notes) = input.notes {
        active.notes = Set(non_blank(notes));
    }
    if let Some(tags) = input.tags {
        active.tags = Set(Tags(tags));
    }
    if let Some(assigned_to_id) = input.assigned_to_id {
        active.assigned_to_id = Set(assigned_to_id);
    }
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

/// Delete a submission; its responses go with it (FK cascade).
pub async fn delete_submission(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    form_submissions::Entity::delete_by_id(id).exec(db).await
}

/// Apply the same changes to many submissions in one transaction.
///
/// Unknown ids fail their item and roll the whole batch back.
pub async fn bulk_update_submissions(
    db: &DatabaseConnection,
    ids: &[Uuid],
    changes: &BulkChanges,
) -> Result<Vec<BatchItemResult>, DbErr> {
    let txn = db.begin().await?;
    let now = chrono::Utc::now();
    let mut results = Vec::with_capacity(ids.len());

    for &id in ids {
        let Some(submission) = form_submissions::Entity::find_by_id(id).one(&txn).await? else {
            results.push(BatchItemResult::failed(id, "Form submission not found"));
            continue;
        };

        let mut active: form_submissions::ActiveModel = submission.into();
        if let Some(status) = changes.status {
            active.status = Set(status);
        }
        if let Some(priority) = changes.priority {
            active.priority = Set(priority);
        }
        if let Some(assigned_to_id) = changes.assigned_to_id {
            active.assigned_to_id = Set(assigned_to_id);
        }
        active.updated_at = Set(now);
        active.update(&txn).await?;

        results.push(BatchItemResult::ok(id));
    }

    if results.iter().all(|r| r.success) {
        txn.commit().await?;
    } else {
        txn.rollback().await?;
    }

    Ok(results)
}

/// Record a staff reply and mark the submission RESPONDED, atomically.
pub async fn respond_to_submission(
    db: &DatabaseConnection,
    form_id: Uuid,
    input: NewResponse,
) -> Result<form_responses::Model, DbErr> {
    let txn = db.begin().await?;

    let submission = form_submissions::Entity::find_by_id(form_id)
        .one(&txn)
        .await?
        .ok_or(DbErr::RecordNotFound(format!(
            "Form submission {form_id} not found"
        )))?;

    let now = chrono::Utc::now();
    let response = form_responses::ActiveModel {
        id: Set(Uuid::new_v4()),
        form_id: Set(form_id),
        responder_id: Set(input.responder_id),
        responder_name: Set(input.responder_name),
        method: Set(input.method),
        content: Set(input.content),
        attachments: Set(Attachments(input.attachments)),
        responded_at: Set(now),
    }
    .insert(&txn)
    .await?;

    let mut active: form_submissions::ActiveModel = submission.into();
    active.status = Set(FormStatus::Responded);
    active.updated_at = Set(now);
    active.update(&txn).await?;

    txn.commit().await?;
    Ok(response)
}

/// All replies to a submission, newest first.
pub async fn get_responses_for_submission(
    db: &DatabaseConnection,
    form_id: Uuid,
) -> Result<Vec<form_responses::Model>, DbErr> {
    form_responses::Entity::find()
        .filter(form_responses::Column::FormId.eq(form_id))
        .order_by_desc(form_responses::Column::RespondedAt)
        .all(db)
        .await
}

pub async fn form_stats(db: &DatabaseConnection) -> Result<serde_json::Value, DbErr> {
    let windows = TimeWindows::now();

    let total = form_submissions::Entity::find().count(db).await?;
    let recent = form_submissions::Entity::find()
        .filter(form_submissions::Column::SubmittedAt.gte(windows.week_ago))
        .count(db)
        .await?;
    let this_month = form_submissions::Entity::find()
        .filter(form_submissions::Column::SubmittedAt.gte(windows.month_start))
        .count(db)
        .await?;

    let by_status =
        stats::grouped_counts::<form_submissions::Entity, _>(db, form_submissions::Column::Status)
            .await?;
    let by_priority = stats::grouped_counts::<form_submissions::Entity, _>(
        db,
        form_submissions::Column::Priority,
    )
    .await?;
    let by_type = stats::grouped_counts::<form_submissions::Entity, _>(
        db,
        form_submissions::Column::FormType,
    )
    .await?;

    Ok(serde_json::json!({
        "total": total,
        "byStatus": stats::enum_breakdown::<FormStatus>(&by_status),
        "byPriority": stats::enum_breakdown::<Priority>(&by_priority),
        "byType": stats::enum_breakdown::<FormType>(&by_type),
        "recent": recent,
        "thisMonth": this_month,
    }))
}
