pub use sea_orm_migration::prelude::*;

mod m20251004_101500_create_user_table;
mod m20251004_102200_create_group_tables;
mod m20251006_091000_create_bug_table;
mod m20251012_153000_create_billing_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251004_101500_create_user_table::Migration),
            Box::new(m20251004_102200_create_group_tables::Migration),
            Box::new(m20251006_091000_create_bug_table::Migration),
            Box::new(m20251012_153000_create_billing_tables::Migration),
        ]
    }
}
