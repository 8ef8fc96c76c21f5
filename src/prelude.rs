pub use std::{sync::Arc, time::Duration};

pub use anyhow::Context;
pub use chrono::{NaiveDateTime as DateTime, TimeDelta, Utc};
pub use sea_orm::{
  ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, Database,
  DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter,
  QueryOrder, QuerySelect, Set, TransactionTrait,
};
pub use tracing::{debug, error, info, warn};

pub use crate::error::{Error, Invalid, Redemption, Result};
pub use crate::utils;
