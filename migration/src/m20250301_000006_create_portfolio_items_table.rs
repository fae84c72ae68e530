use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `portfolio_items` table and its columns.
#[derive(DeriveIden)]
enum PortfolioItems {
    Table,
    Id,
    Title,
    Description,
    ServiceCategory,
    Location,
    Images,
    ProjectValue,
    CompletedAt,
    IsVisible,
    IsFeatured,
    DisplayOrder,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PortfolioItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PortfolioItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PortfolioItems::Title).string().not_null())
                    .col(ColumnDef::new(PortfolioItems::Description).text().null())
                    .col(
                        ColumnDef::new(PortfolioItems::ServiceCategory)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PortfolioItems::Location).string().null())
                    .col(ColumnDef::new(PortfolioItems::Images).json_binary().not_null())
                    .col(ColumnDef::new(PortfolioItems::ProjectValue).double().null())
                    .col(
                        ColumnDef::new(PortfolioItems::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PortfolioItems::IsVisible)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(PortfolioItems::IsFeatured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PortfolioItems::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PortfolioItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PortfolioItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PortfolioItems::Table).to_owned())
            .await
    }
}
