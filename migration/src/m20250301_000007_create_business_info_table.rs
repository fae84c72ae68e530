use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `business_info` table and its columns.
///
/// The table holds at most one row, keyed by a fixed id.
#[derive(DeriveIden)]
enum BusinessInfo {
    Table,
    Id,
    CompanyName,
    Tagline,
    Email,
    Phone,
    Address,
    City,
    State,
    PostalCode,
    Website,
    LicenseNumber,
    SocialMedia,
    BusinessHours,
    Services,
    UpdatedBy,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BusinessInfo::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BusinessInfo::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BusinessInfo::CompanyName).string().not_null())
                    .col(ColumnDef::new(BusinessInfo::Tagline).string().null())
                    .col(ColumnDef::new(BusinessInfo::Email).string().not_null())
                    .col(ColumnDef::new(BusinessInfo::Phone).string().not_null())
                    .col(ColumnDef::new(BusinessInfo::Address).string().null())
                    .col(ColumnDef::new(BusinessInfo::City).string().null())
                    .col(ColumnDef::new(BusinessInfo::State).string().null())
                    .col(ColumnDef::new(BusinessInfo::PostalCode).string().null())
                    .col(ColumnDef::new(BusinessInfo::Website).string().null())
                    .col(ColumnDef::new(BusinessInfo::LicenseNumber).string().null())
                    .col(ColumnDef::new(BusinessInfo::SocialMedia).json_binary().not_null())
                    .col(
                        ColumnDef::new(BusinessInfo::BusinessHours)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BusinessInfo::Services).json_binary().not_null())
                    .col(ColumnDef::new(BusinessInfo::UpdatedBy).string().null())
                    .col(
                        ColumnDef::new(BusinessInfo::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BusinessInfo::Table).to_owned())
            .await
    }
}
