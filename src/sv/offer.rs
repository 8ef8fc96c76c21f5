use sea_orm::sea_query::OnConflict;

use crate::{entity::offer, prelude::*};

pub struct Offer<'a, C = DatabaseConnection> {
  db: &'a C,
}

impl<'a, C: ConnectionTrait> Offer<'a, C> {
  pub fn new(db: &'a C) -> Self {
    Self { db }
  }

  /// Inserts the offer or overwrites the discount of the existing one with
  /// the same name, returning its id.
  pub async fn upsert(&self, name: &str, discount: f64) -> Result<i32> {
    let offer = offer::ActiveModel {
      id: NotSet,
      name: Set(name.to_string()),
      discount: Set(discount),
    };

    offer::Entity::insert(offer)
      .on_conflict(
        OnConflict::column(offer::Column::Name)
          .update_column(offer::Column::Discount)
          .to_owned(),
      )
      .exec_without_returning(self.db)
      .await?;

    // last_insert_rowid is stale after the update branch, so re-read by name
    let id: Option<i32> = offer::Entity::find()
      .select_only()
      .column(offer::Column::Id)
      .filter(offer::Column::Name.eq(name))
      .into_tuple()
      .one(self.db)
      .await?;

    match id {
      Some(id) if id != 0 => Ok(id),
      _ => Err(Error::OfferUpsert),
    }
  }

  #[allow(dead_code)]
  pub async fn by_name(&self, name: &str) -> Result<Option<offer::Model>> {
    let offer = offer::Entity::find()
      .filter(offer::Column::Name.eq(name))
      .one(self.db)
      .await?;
    Ok(offer)
  }
}

#[cfg(test)]
mod tests {
  use sea_orm::PaginatorTrait;

  use super::*;
  use crate::testing;

  #[tokio::test]
  async fn test_upsert_overwrites_discount() {
    let db = testing::setup_test_db().await;
    let sv = Offer::new(&db);

    let first = sv.upsert("S1", 50.0).await.unwrap();
    let second = sv.upsert("S1", 20.0).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(offer::Entity::find().count(&db).await.unwrap(), 1);

    let offer = sv.by_name("S1").await.unwrap().unwrap();
    assert_eq!(offer.discount, 20.0);
  }

  #[tokio::test]
  async fn test_upsert_distinct_names() {
    let db = testing::setup_test_db().await;
    let sv = Offer::new(&db);

    let a = sv.upsert("S1", 50.0).await.unwrap();
    let b = sv.upsert("S2", 50.0).await.unwrap();

    assert_ne!(a, b);
  }
}
