use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `form_responses` table and its columns.
#[derive(DeriveIden)]
enum FormResponses {
    Table,
    Id,
    FormId,
    ResponderId,
    ResponderName,
    Method,
    Content,
    Attachments,
    RespondedAt,
}

#[derive(DeriveIden)]
enum FormSubmissions {
    Table,
    Id,
}

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
                    .table(FormResponses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FormResponses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FormResponses::FormId).uuid().not_null())
                    .col(ColumnDef::new(FormResponses::ResponderId).uuid().not_null())
                    .col(ColumnDef::new(FormResponses::ResponderName).string().null())
                    .col(ColumnDef::new(FormResponses::Method).string().not_null())
                    .col(ColumnDef::new(FormResponses::Content).text().not_null())
                    .col(
                        ColumnDef::new(FormResponses::Attachments)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FormResponses::RespondedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_form_responses_form_id")
                            .from(FormResponses::Table, FormResponses::FormId)
                            .to(FormSubmissions::Table, FormSubmissions::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_form_responses_responder_id")
                            .from(FormResponses::Table, FormResponses::ResponderId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FormResponses::Table).to_owned())
            .await
    }
}
