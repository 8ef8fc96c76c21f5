use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::voucher;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub name: String,
  #[sea_orm(unique)]
  pub email: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "voucher::Entity")]
  Vouchers,
}

impl Related<voucher::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Vouchers.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
