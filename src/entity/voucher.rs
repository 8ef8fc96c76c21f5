//! Voucher - single-use discount token bound to a customer and an offer

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{customer, offer};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vouchers")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub code: String,
  pub customer_id: i32,
  pub special_offer_id: i32,
  pub expired_at: DateTime,
  /// Set once on redemption, never cleared
  pub used_at: Option<DateTime>,
}

impl Model {
  pub fn is_expired(&self, now: DateTime) -> bool {
    self.expired_at <= now
  }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "customer::Entity",
    from = "Column::CustomerId",
    to = "customer::Column::Id"
  )]
  Customer,
  #[sea_orm(
    belongs_to = "offer::Entity",
    from = "Column::SpecialOfferId",
    to = "offer::Column::Id"
  )]
  Offer,
}

impl Related<customer::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Customer.def()
  }
}

impl Related<offer::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Offer.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
