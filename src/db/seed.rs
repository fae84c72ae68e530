use sea_orm::*;
use serde::Serialize;
use tracing::info;

use crate::models::business_info::{self, BusinessHours, BusinessInfoInput, SocialMedia};
use crate::models::page_contents::{self, PageInput};
use crate::models::portfolio::{self, PortfolioInput};
use crate::models::settings::{self, SettingWrite};
use crate::models::testimonials::{self, TestimonialInput};

/// Rows inserted per table by [`seed_sample_data`].
#[derive(Debug, Default, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub business_info: u64,
    pub settings: u64,
    pub pages: u64,
    pub testimonials: u64,
    pub portfolio: u64,
}

/// Fill empty content tables with sample data. Tables that already have rows are left alone.
pub async fn seed_sample_data(db: &DatabaseConnection) -> Result<SeedReport, DbErr> {
    let mut report = SeedReport::default();

    if business_info::Entity::find().count(db).await? == 0 {
        super::business_info::upsert_business_info(db, sample_business_info(), None).await?;
        report.business_info = 1;
    }

    if settings::Entity::find().count(db).await? == 0 {
        for (key, value, is_public) in [
            ("site_title", "Reliable Home Services", true),
            ("primary_color", "#1d4ed8", true),
            ("contact_notification_email", "office@example.com", false),
            ("maintenance_mode", "false", false),
        ] {
            super::settings::upsert_setting(
                db,
                SettingWrite {
                    key: key.to_string(),
                    value: value.to_string(),
                    description: None,
                    is_public: Some(is_public),
                    updated_by: None,
                },
            )
            .await?;
            report.settings += 1;
        }
    }

    if page_contents::Entity::find().count(db).await? == 0 {
        for (slug, title, content) in [
            ("about", "About Us", "<p>Family owned and operating since 1998.</p>"),
            ("services", "Our Services", "<p>Repairs, installations and maintenance.</p>"),
            ("privacy", "Privacy Policy", "<p>We only use your details to reply to you.</p>"),
        ] {
            super::pages::upsert_page(
                db,
                slug,
                PageInput {
                    title: Some(title.to_string()),
                    content: Some(content.to_string()),
                    meta_description: None,
                },
                None,
            )
            .await?;
            report.pages += 1;
        }
    }

    if testimonials::Entity::find().count(db).await? == 0 {
        for (name, text, rating, project_type, featured) in [
            ("Maria Lopez", "Fast, tidy and fairly priced.", 5, "Repair", true),
            ("James Carter", "Showed up on time and explained everything.", 5, "Installation", false),
            ("Priya Shah", "Good work, took a day longer than planned.", 4, "Maintenance", false),
        ] {
            super::testimonials::insert_testimonial(
                db,
                TestimonialInput {
                    customer_name: Some(name.to_string()),
                    testimonial_text: Some(text.to_string()),
                    rating: Some(rating),
                    project_type: Some(project_type.to_string()),
                    is_featured: Some(featured),
                    ..Default::default()
                },
            )
            .await?;
            report.testimonials += 1;
        }
    }

    if portfolio::Entity::find().count(db).await? == 0 {
        for (title, category, value) in [
            ("Kitchen remodel", "Renovation", 18500.0),
            ("Emergency boiler replacement", "Heating", 4200.0),
        ] {
            super::portfolio::insert_portfolio(
                db,
                PortfolioInput {
                    title: Some(title.to_string()),
                    service_category: Some(category.to_string()),
                    project_value: Some(value),
                    ..Default::default()
                },
            )
            .await?;
            report.portfolio += 1;
        }
    }

    info!(?report, "Seeded sample data");
    Ok(report)
}

fn sample_business_info() -> BusinessInfoInput {
    BusinessInfoInput {
        company_name: Some("Reliable Home Services".to_string()),
        tagline: Some("Done right the first time".to_string()),
        email: Some("office@example.com".to_string()),
        phone: Some("+1 555 0100".to_string()),
        city: Some("Springfield".to_string()),
        social_media: SocialMedia::default(),
        business_hours: BusinessHours {
            monday: Some("08:00-17:00".to_string()),
            tuesday: Some("08:00-17:00".to_string()),
            wednesday: Some("08:00-17:00".to_string()),
            thursday: Some("08:00-17:00".to_string()),
            friday: Some("08:00-17:00".to_string()),
            saturday: Some("09:00-13:00".to_string()),
            sunday: Some("Closed".to_string()),
            emergency: Some("24/7 emergency line".to_string()),
        },
        services: vec!["Repair".to_string(), "Installation".to_string()],
        ..Default::default()
    }
}
