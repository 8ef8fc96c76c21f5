use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(SpecialOffers::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(SpecialOffers::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          // upserts conflict on this key
          .col(
            ColumnDef::new(SpecialOffers::Name)
              .string()
              .not_null()
              .unique_key(),
          )
          .col(ColumnDef::new(SpecialOffers::Discount).double().not_null())
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(SpecialOffers::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum SpecialOffers {
  Table,
  Id,
  Name,
  Discount,
}
