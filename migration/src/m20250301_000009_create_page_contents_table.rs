use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `page_contents` table and its columns.
#[derive(DeriveIden)]
enum PageContents {
    Table,
    Id,
    Slug,
    Title,
    Content,
    MetaDescription,
    LastUpdated,
    UpdatedBy,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PageContents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PageContents::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PageContents::Slug)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(PageContents::Title).string().not_null())
                    .col(ColumnDef::new(PageContents::Content).text().not_null())
                    .col(ColumnDef::new(PageContents::MetaDescription).string().null())
                    .col(
                        ColumnDef::new(PageContents::LastUpdated)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PageContents::UpdatedBy).string().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PageContents::Table).to_owned())
            .await
    }
}
