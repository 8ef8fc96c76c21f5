use crate::{entity::customer, prelude::*};

pub struct Customer<'a, C = DatabaseConnection> {
  db: &'a C,
}

impl<'a, C: ConnectionTrait> Customer<'a, C> {
  pub fn new(db: &'a C) -> Self {
    Self { db }
  }

  /// Resolves the surrogate id of the customer owning `email`.
  pub async fn id_by_email(&self, email: &str) -> Result<i32> {
    let id: Option<i32> = customer::Entity::find()
      .select_only()
      .column(customer::Column::Id)
      .filter(customer::Column::Email.eq(email))
      .into_tuple()
      .one(self.db)
      .await?;

    match id {
      Some(id) if id != 0 => Ok(id),
      _ => Err(Error::CustomerNotFound),
    }
  }

  pub async fn by_email(&self, email: &str) -> Result<Option<customer::Model>> {
    let customer = customer::Entity::find()
      .filter(customer::Column::Email.eq(email))
      .one(self.db)
      .await?;
    Ok(customer)
  }

  pub async fn get_or_create(
    &self,
    name: &str,
    email: &str,
  ) -> Result<customer::Model> {
    if let Some(customer) = self.by_email(email).await? {
      return Ok(customer);
    }

    let customer = customer::ActiveModel {
      id: NotSet,
      name: Set(name.to_string()),
      email: Set(email.to_string()),
    };

    Ok(customer.insert(self.db).await?)
  }
}
