pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users_table;
mod m20250301_000002_create_form_submissions_table;
mod m20250301_000003_create_form_responses_table;
mod m20250301_000004_create_testimonials_table;
mod m20250301_000005_create_customers_table;
mod m20250301_000006_create_portfolio_items_table;
mod m20250301_000007_create_business_info_table;
mod m20250301_000008_create_settings_table;
mod m20250301_000009_create_page_contents_table;
mod m20250305_000001_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users_table::Migration),
            Box::new(m20250301_000002_create_form_submissions_table::Migration),
            Box::new(m20250301_000003_create_form_responses_table::Migration),
            Box::new(m20250301_000004_create_testimonials_table::Migration),
            Box::new(m20250301_000005_create_customers_table::Migration),
            Box::new(m20250301_000006_create_portfolio_items_table::Migration),
            Box::new(m20250301_000007_create_business_info_table::Migration),
            Box::new(m20250301_000008_create_settings_table::Migration),
            Box::new(m20250301_000009_create_page_contents_table::Migration),
            Box::new(m20250305_000001_add_indexes::Migration),
        ]
    }
}
