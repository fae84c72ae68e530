pub mod business_info;
pub mod customers;
pub mod forms;
pub mod pages;
pub mod portfolio;
pub mod seed;
pub mod settings;
pub mod stats;
pub mod testimonials;
pub mod users;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, Select, SqlErr,
};
use std::time::Duration;

use crate::models::{PageRequest, Pagination};

/// Create a SeaORM database connection pool.
pub async fn create_pool(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .max_connections(10)
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    Database::connect(options).await
}

/// Run one page of `select` and the matching total count.
///
/// `total` counts every row matching the filter, independent of page/limit.
pub async fn fetch_page<E, C>(
    db: &C,
    select: Select<E>,
    paging: PageRequest,
) -> Result<(Vec<E::Model>, Pagination), DbErr>
where
    E: EntityTrait,
    E::Model: Send + Sync + 'static,
    C: ConnectionTrait,
{
    let paginator = select.paginate(db, paging.limit);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(paging.page - 1).await?;
    Ok((items, Pagination::new(paging, total)))
}

/// Whether `err` is the store rejecting a duplicate unique key.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Round-trip the store; used by readiness checks.
pub async fn ping(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.ping().await
}
