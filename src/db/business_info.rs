use sea_orm::sea_query::OnConflict;
use sea_orm::*;

use crate::models::business_info::{self, BusinessInfoInput, SINGLETON_ID, Services};
use crate::models::non_blank;

/// The business profile, if one has been saved.
pub async fn get_business_info(
    db: &DatabaseConnection,
) -> Result<Option<business_info::Model>, DbErr> {
    business_info::Entity::find_by_id(SINGLETON_ID).one(db).await
}

/// Create or fully replace the single business-info row.
pub async fn upsert_business_info(
    db: &DatabaseConnection,
    input: BusinessInfoInput,
    updated_by: Option<String>,
) -> Result<business_info::Model, DbErr> {
    let row = business_info::ActiveModel {
        id: Set(SINGLETON_ID),
        company_name: Set(input.company_name.unwrap_or_default().trim().to_string()),
        tagline: Set(non_blank(input.tagline)),
        email: Set(input.email.unwrap_or_default().trim().to_string()),
        phone: Set(input.phone.unwrap_or_default().trim().to_string()),
        address: Set(non_blank(input.address)),
        city: Set(non_blank(input.city)),
        state: Set(non_blank(input.state)),
        postal_code: Set(non_blank(input.postal_code)),
        website: Set(non_blank(input.website)),
        license_number: Set(non_blank(input.license_number)),
        social_media: Set(input.social_media),
        business_hours: Set(input.business_hours),
        services: Set(Services(input.services)),
        updated_by: Set(updated_by),
        updated_at: Set(chrono::Utc::now()),
    };

    business_info::Entity::insert(row)
        .on_conflict(
            OnConflict::column(business_info::Column::Id)
                .update_columns([
                    business_info::Column::CompanyName,
                    business_info::Column::Tagline,
                    business_info::Column::Email,
                    business_info::Column::Phone,
                    business_info::Column::Address,
                    business_info::Column::City,
                    business_info::Column::State,
                    business_info::Column::PostalCode,
                    business_info::Column::Website,
                    business_info::Column::LicenseNumber,
                    business_info::Column::SocialMedia,
                    business_info::Column::BusinessHours,
                    business_info::Column::Services,
                    business_info::Column::UpdatedBy,
                    business_info::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec(db)
        .await?;

    business_info::Entity::find_by_id(SINGLETON_ID)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Business info not found".to_string()))
}
