use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `form_submissions` table and its columns.
#[derive(DeriveIden)]
enum FormSubmissions {
    Table,
    Id,
    Type,
    Status,
    Priority,
    CustomerName,
    CustomerEmail,
    CustomerInfo,
    FormData,
    Tags,
    Notes,
    AssignedToId,
    SubmittedAt,
    UpdatedAt,
}

/// Re-declare parent table identifiers for foreign-key references.
#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FormSubmissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FormSubmissions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FormSubmissions::Type).string().not_null())
                    .col(ColumnDef::new(FormSubmissions::Status).string().not_null())
                    .col(ColumnDef::new(FormSubmissions::Priority).string().not_null())
                    // Copied out of customer_info at intake so search stays a plain LIKE.
                    .col(ColumnDef::new(FormSubmissions::CustomerName).string().not_null())
                    .col(ColumnDef::new(FormSubmissions::CustomerEmail).string().not_null())
                    .col(
                        ColumnDef::new(FormSubmissions::CustomerInfo)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FormSubmissions::FormData).json_binary().not_null())
                    .col(ColumnDef::new(FormSubmissions::Tags).json_binary().not_null())
                    .col(ColumnDef::new(FormSubmissions::Notes).text().null())
                    .col(ColumnDef::new(FormSubmissions::AssignedToId).uuid().null())
                    .col(
                        ColumnDef::new(FormSubmissions::SubmittedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FormSubmissions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_form_submissions_assigned_to_id")
                            .from(FormSubmissions::Table, FormSubmissions::AssignedToId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FormSubmissions::Table).to_owned())
            .await
    }
}
