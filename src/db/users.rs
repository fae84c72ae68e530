use sea_orm::*;
use uuid::Uuid;

use crate::models::users::{self, CreateUserFromAuth, Role, UpdateUser, UserListQuery};
use crate::models::{PageRequest, Pagination, non_blank};

/// Look a user up by (lower-cased) email.
pub async fn get_user_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email.to_lowercase()))
        .one(db)
        .await
}

/// Return the user for this email, creating it on first sign-in.
///
/// A concurrent first sign-in for the same email loses the insert race on the
/// unique email index; the loser re-reads the winner's row.
pub async fn find_or_create_from_auth(
    db: &DatabaseConnection,
    input: CreateUserFromAuth,
) -> Result<users::Model, DbErr> {
    let email = input.email.to_lowercase();
    if let Some(existing) = get_user_by_email(db, &email).await? {
        return Ok(existing);
    }

    let now = chrono::Utc::now();
    let new_user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        email: Set(email.clone()),
        image: Set(input.image),
        role: Set(input.role),
        is_active: Set(true),
        password_hash: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    match new_user.insert(db).await {
        Ok(user) => Ok(user),
        Err(e) if super::is_unique_violation(&e) => {
            get_user_by_email(db, &email).await?.ok_or(e)
        }
        Err(e) => Err(e),
    }
}

pub async fn list_users(
    db: &DatabaseConnection,
    query: &UserListQuery,
) -> Result<(Vec<users::Model>, Pagination), DbErr> {
    let mut select = users::Entity::find();

    if let Some(search) = non_blank(query.search.clone()) {
        select = select.filter(
            Condition::any()
                .add(users::Column::Email.contains(search.as_str()))
                .add(users::Column::Name.contains(search.as_str())),
        );
    }
    if let Some(role) = query.role {
        select = select.filter(users::Column::Role.eq(role));
    }
    if let Some(active) = query.is_active {
        select = select.filter(users::Column::IsActive.eq(active));
    }

    let select = select.order_by_desc(users::Column::CreatedAt);
    super::fetch_page(db, select, PageRequest::new(query.page, query.limit)).await
}

/// Fetch a single user by ID.
pub async fn get_user_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(id).one(db).await
}

/// Create an account up-front (admin-level). `password_hash` is already hashed.
pub async fn create_user(
    db: &DatabaseConnection,
    email: String,
    name: Option<String>,
    role: Role,
    password_hash: Option<String>,
) -> Result<users::Model, DbErr> {
    let now = chrono::Utc::now();
    let new_user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(non_blank(name)),
        email: Set(email.to_lowercase()),
        image: Set(None),
        role: Set(role),
        is_active: Set(true),
        password_hash: Set(password_hash),
        created_at: Set(now),
        updated_at: Set(now),
    };

    new_user.insert(db).await
}

/// Update an existing user (admin-level). A new password arrives pre-hashed.
pub async fn update_user(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateUser,
    password_hash: Option<String>,
) -> Result<users::Model, DbErr> {
    let user = users::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

    let mut active: users::ActiveModel = user.into();

    if let Some(name) = input.name {
        active.name = Set(non_blank(Some(name)));
    }
    if let Some(image) = input.image {
        active.image = Set(non_blank(Some(image)));
    }
    if let Some(role) = input.role {
        active.role = Set(role);
    }
    if let Some(is_active) = input.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(hash) = password_hash {
        active.password_hash = Set(Some(hash));
    }
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

/// Soft delete: the row stays, the account can no longer sign in.
pub async fn deactivate_user(db: &DatabaseConnection, id: Uuid) -> Result<users::Model, DbErr> {
    update_user(
        db,
        id,
        UpdateUser {
            is_active: Some(false),
            ..Default::default()
        },
        None,
    )
    .await
}
