pub use sea_orm_migration::prelude::*;

mod m20250301_090000_create_schema_and_enums;
mod m20250301_091500_create_catalog_and_project_tables;
mod m20250302_100000_add_initial_admin_user;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_090000_create_schema_and_enums::Migration),
            Box::new(m20250301_091500_create_catalog_and_project_tables::Migration),
            Box::new(m20250302_100000_add_initial_admin_user::Migration),
        ]
    }
}
