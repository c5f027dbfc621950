pub use sea_orm_migration::prelude::*;

mod m20260810_000000_create_users;
mod m20260810_000001_create_items;
mod m20260810_000002_create_bookings;
mod m20260810_000003_create_comments;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260810_000000_create_users::Migration),
            Box::new(m20260810_000001_create_items::Migration),
            Box::new(m20260810_000002_create_bookings::Migration),
            Box::new(m20260810_000003_create_comments::Migration),
        ]
    }
}
