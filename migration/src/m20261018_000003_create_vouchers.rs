use sea_orm_migration::prelude::*;

use super::{
  m20261018_000001_create_customers::Customers,
  m20261018_000002_create_special_offers::SpecialOffers,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Vouchers::Table)
          .if_not_exists()
          .col(ColumnDef::new(Vouchers::Code).string().not_null().primary_key())
          .col(ColumnDef::new(Vouchers::CustomerId).integer().not_null())
          .col(ColumnDef::new(Vouchers::SpecialOfferId).integer().not_null())
          .col(ColumnDef::new(Vouchers::ExpiredAt).date_time().not_null())
          .col(ColumnDef::new(Vouchers::UsedAt).date_time().null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_vouchers_customer")
              .from(Vouchers::Table, Vouchers::CustomerId)
              .to(Customers::Table, Customers::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_vouchers_special_offer")
              .from(Vouchers::Table, Vouchers::SpecialOfferId)
              .to(SpecialOffers::Table, SpecialOffers::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_vouchers_customer")
          .table(Vouchers::Table)
          .col(Vouchers::CustomerId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Vouchers::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Vouchers {
  Table,
  Code,
  CustomerId,
  SpecialOfferId,
  ExpiredAt,
  UsedAt,
}
