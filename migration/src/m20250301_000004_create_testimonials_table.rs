use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `testimonials` table and its columns.
#[derive(DeriveIden)]
enum Testimonials {
    Table,
    Id,
    CustomerName,
    CustomerTitle,
    CustomerCompany,
    CustomerPhoto,
    TestimonialText,
    Rating,
    ProjectType,
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
                    .table(Testimonials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Testimonials::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Testimonials::CustomerName).string().not_null())
                    .col(ColumnDef::new(Testimonials::CustomerTitle).string().null())
                    .col(ColumnDef::new(Testimonials::CustomerCompany).string().null())
                    .col(ColumnDef::new(Testimonials::CustomerPhoto).string().null())
                    .col(ColumnDef::new(Testimonials::TestimonialText).text().not_null())
                    .col(
                        ColumnDef::new(Testimonials::Rating)
                            .integer()
                            .not_null()
                            .default(5),
                    )
                    .col(ColumnDef::new(Testimonials::ProjectType).string().null())
                    .col(
                        ColumnDef::new(Testimonials::IsVisible)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Testimonials::IsFeatured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Testimonials::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Testimonials::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Testimonials::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Testimonials::Table).to_owned())
            .await
    }
}
