pub use sea_orm_migration::prelude::*;

mod m20261018_000001_create_customers;
mod m20261018_000002_create_special_offers;
mod m20261018_000003_create_vouchers;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20261018_000001_create_customers::Migration),
      Box::new(m20261018_000002_create_special_offers::Migration),
      Box::new(m20261018_000003_create_vouchers::Migration),
    ]
  }
}
