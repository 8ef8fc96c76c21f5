use std::{env, fmt::Display, str::FromStr};

use migration::{Migrator, MigratorTrait};

use crate::{lifecycle::Lifecycle, prelude::*};

#[derive(Debug, Clone)]
pub struct Config {
  pub database_url: String,
  pub port: u16,
  pub request_timeout: Duration,
  pub rate_limit_per_second: u64,
  pub rate_limit_burst: u32,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      database_url: String::from("sqlite:vouchers.db?mode=rwc"),

      port: 5000,
      request_timeout: Duration::from_secs(60),
      rate_limit_per_second: 2,
      rate_limit_burst: 100,
    }
  }
}

fn parse_var<T>(key: &str) -> anyhow::Result<Option<T>>
where
  T: FromStr,
  T::Err: Display,
{
  match env::var(key) {
    Ok(raw) => raw
      .trim()
      .parse()
      .map(Some)
      .map_err(|err| anyhow::anyhow!("Invalid {key} `{raw}`: {err}")),
    Err(_) => Ok(None),
  }
}

impl Config {
  /// Overrides the defaults with whatever is set in the environment.
  pub fn from_env() -> anyhow::Result<Self> {
    let mut config = Self::default();

    if let Ok(url) = env::var("DATABASE_URL") {
      config.database_url = url;
    }
    if let Some(port) = parse_var("PORT")? {
      config.port = port;
    }
    if let Ok(raw) = env::var("REQUEST_TIMEOUT") {
      config.request_timeout = humantime::parse_duration(raw.trim())
        .with_context(|| format!("Invalid REQUEST_TIMEOUT `{raw}`"))?;
    }
    if let Some(per_second) = parse_var("RATE_LIMIT_PER_SECOND")? {
      config.rate_limit_per_second = per_second;
    }
    if let Some(burst) = parse_var("RATE_LIMIT_BURST")? {
      config.rate_limit_burst = burst;
    }

    Ok(config)
  }
}

pub struct AppState {
  pub db: DatabaseConnection,
  pub config: Config,
}

impl AppState {
  pub async fn new(config: Config) -> anyhow::Result<Self> {
    info!("Connecting to database...");
    let db = Database::connect(config.database_url.as_str())
      .await
      .context("Failed to connect to database")?;

    info!("Running migrations...");
    Migrator::up(&db, None).await.context("Failed to run migrations")?;

    Ok(Self::with_db(db, config))
  }

  pub fn with_db(db: DatabaseConnection, config: Config) -> Self {
    Self { db, config }
  }

  pub fn lifecycle(&self) -> Lifecycle<'_> {
    Lifecycle::new(&self.db)
  }
}
