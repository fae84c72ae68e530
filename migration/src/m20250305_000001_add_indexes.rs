use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum FormSubmissions {
    Table,
    Status,
    Priority,
    SubmittedAt,
}

#[derive(DeriveIden)]
enum FormResponses {
    Table,
    FormId,
}

#[derive(DeriveIden)]
enum Testimonials {
    Table,
    DisplayOrder,
}

#[derive(DeriveIden)]
enum PortfolioItems {
    Table,
    DisplayOrder,
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    Email,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Status/priority filters on the submissions inbox
        manager
            .create_index(
                Index::create()
                    .name("idx_form_submissions_status")
                    .table(FormSubmissions::Table)
                    .col(FormSubmissions::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_form_submissions_priority")
                    .table(FormSubmissions::Table)
                    .col(FormSubmissions::Priority)
                    .to_owned(),
            )
            .await?;

        // Time-window counts on the dashboard
        manager
            .create_index(
                Index::create()
                    .name("idx_form_submissions_submitted_at")
                    .table(FormSubmissions::Table)
                    .col(FormSubmissions::SubmittedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_form_responses_form_id")
                    .table(FormResponses::Table)
                    .col(FormResponses::FormId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_testimonials_display_order")
                    .table(Testimonials::Table)
                    .col(Testimonials::DisplayOrder)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_portfolio_items_display_order")
                    .table(PortfolioItems::Table)
                    .col(PortfolioItems::DisplayOrder)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_customers_email")
                    .table(Customers::Table)
                    .col(Customers::Email)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_form_submissions_status",
            "idx_form_submissions_priority",
            "idx_form_submissions_submitted_at",
            "idx_form_responses_form_id",
            "idx_testimonials_display_order",
            "idx_portfolio_items_display_order",
            "idx_customers_email",
        ] {
            manager.drop_index(Index::drop().name(name).to_owned()).await?;
        }

        Ok(())
    }
}
