//! Shared fixtures for in-crate tests

use migration::{Migrator, MigratorTrait};
use sea_orm::ConnectOptions;

use crate::{entity::voucher, prelude::*, sv};

/// In-memory SQLite database with all migrations applied.
///
/// Pinned to one connection: every pooled connection would otherwise open
/// its own empty in-memory database.
pub async fn setup_test_db() -> DatabaseConnection {
  let mut opts = ConnectOptions::new("sqlite::memory:");
  opts.max_connections(1).min_connections(1).sqlx_logging(false);

  let db = Database::connect(opts).await.unwrap();
  Migrator::up(&db, None).await.unwrap();
  db
}

pub async fn seed_customer(db: &DatabaseConnection, email: &str) -> i32 {
  sv::Customer::new(db).get_or_create("customer", email).await.unwrap().id
}

/// Inserts a voucher directly, bypassing the expiry checks of issuing.
pub async fn insert_voucher(
  db: &DatabaseConnection,
  customer_id: i32,
  offer_name: &str,
  code: &str,
  expired_at: DateTime,
  used_at: Option<DateTime>,
) {
  let offer_id = sv::Offer::new(db).upsert(offer_name, 10.0).await.unwrap();

  voucher::ActiveModel {
    code: Set(code.to_string()),
    customer_id: Set(customer_id),
    special_offer_id: Set(offer_id),
    expired_at: Set(expired_at),
    used_at: Set(used_at),
  }
  .insert(db)
  .await
  .unwrap();
}
