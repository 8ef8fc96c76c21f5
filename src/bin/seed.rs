//! Inserts demo customers `customer{i}@gmail.com`.
//!
//! Usage: `seed [COUNT]` (defaults to 10).

use tracing_subscriber::EnvFilter;
use voucher_pool::{
  prelude::*,
  state::{AppState, Config},
  sv,
};

const DEFAULT_COUNT: usize = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "voucher_pool=info,sea_orm=warn".into()),
    )
    .init();

  let count = match std::env::args().nth(1) {
    Some(raw) => {
      raw.parse().with_context(|| format!("Invalid customer count `{raw}`"))?
    }
    None => DEFAULT_COUNT,
  };

  let app = AppState::new(Config::from_env()?).await?;

  let txn = app.db.begin().await?;
  let customers = sv::Customer::new(&txn);
  for i in 0..count {
    let name = format!("customer {i}");
    let email = format!("customer{i}@gmail.com");

    if let Err(err) = customers.get_or_create(&name, &email).await {
      // nothing from this run is kept
      txn.rollback().await?;
      return Err(err).with_context(|| format!("Failed to seed {email}"));
    }
  }
  txn.commit().await?;

  info!("Seeded {count} customers");
  Ok(())
}
