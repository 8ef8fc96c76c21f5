use sea_orm::{JoinType, RelationTrait, sea_query::Expr};

use crate::{
  entity::{customer, offer, voucher},
  prelude::*,
  sv,
};

/// Voucher row to be issued, together with the offer it references.
#[derive(Debug, Clone)]
pub struct NewVoucher<'a> {
  pub email: &'a str,
  pub offer_name: &'a str,
  pub code: &'a str,
  pub expiry: DateTime,
  pub discount: f64,
}

/// Column-wise listing of a customer's unredeemed vouchers.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Unredeemed {
  pub codes: Vec<String>,
  pub offer_names: Vec<String>,
}

pub struct Voucher<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Voucher<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  #[allow(dead_code)]
  pub async fn by_code(&self, code: &str) -> Result<Option<voucher::Model>> {
    let voucher = voucher::Entity::find_by_id(code).one(self.db).await?;
    Ok(voucher)
  }

  /// Returns when the voucher `code` owned by `email` was redeemed, `None`
  /// while it is still unused.
  ///
  /// An expired voucher fails with [`Redemption::Expired`] whether or not it
  /// was used, an unknown email/code pair with [`Redemption::NotFound`].
  pub async fn redemption_state(
    &self,
    email: &str,
    code: &str,
  ) -> Result<Option<DateTime>> {
    let voucher = voucher::Entity::find()
      .join(JoinType::InnerJoin, voucher::Relation::Customer.def())
      .filter(customer::Column::Email.eq(email))
      .filter(voucher::Column::Code.eq(code))
      .one(self.db)
      .await?
      .ok_or(Redemption::NotFound)?;

    if voucher.is_expired(utils::now()) {
      return Err(Redemption::Expired.into());
    }

    Ok(voucher.used_at)
  }

  /// Stamps `used_at` on `code` and returns the discount of its offer.
  ///
  /// Read and stamp share one transaction. The stamp only matches a row that
  /// is still unused and unexpired, so concurrent callers cannot both win.
  pub async fn redeem(&self, code: &str) -> Result<f64> {
    let txn = self.db.begin().await?;

    match Self::redeem_in(&txn, code).await {
      Ok(discount) => {
        txn.commit().await?;
        Ok(discount)
      }
      Err(err) => Err(sv::rollback(txn, err).await),
    }
  }

  async fn redeem_in(txn: &DatabaseTransaction, code: &str) -> Result<f64> {
    let (voucher, offer) = voucher::Entity::find_by_id(code)
      .find_also_related(offer::Entity)
      .one(txn)
      .await?
      .ok_or(Redemption::NotFound)?;
    let offer = offer.ok_or(Redemption::NotFound)?;

    let now = utils::now();
    let stamped = voucher::Entity::update_many()
      .col_expr(voucher::Column::UsedAt, Expr::value(now))
      .filter(voucher::Column::Code.eq(code))
      .filter(voucher::Column::UsedAt.is_null())
      .filter(voucher::Column::ExpiredAt.gt(now))
      .exec(txn)
      .await?;

    match stamped.rows_affected {
      1 => Ok(offer.discount),
      0 if voucher.is_expired(now) => Err(Redemption::Expired.into()),
      0 => {
        warn!("Voucher `{code}` was redeemed by a concurrent request");
        Err(Redemption::AlreadyRedeemed.into())
      }
      n => Err(Error::Inconsistent(format!(
        "redeeming `{code}` stamped {n} rows"
      ))),
    }
  }

  /// Upserts the offer and inserts an unused voucher for the customer, all
  /// in one transaction. Nothing is written when the customer is unknown.
  pub async fn issue(&self, new: &NewVoucher<'_>) -> Result<()> {
    let txn = self.db.begin().await?;

    match Self::issue_in(&txn, new).await {
      Ok(()) => {
        txn.commit().await?;
        Ok(())
      }
      Err(err) => Err(sv::rollback(txn, err).await),
    }
  }

  async fn issue_in(
    txn: &DatabaseTransaction,
    new: &NewVoucher<'_>,
  ) -> Result<()> {
    let customer_id = sv::Customer::new(txn).id_by_email(new.email).await?;
    let offer_id =
      sv::Offer::new(txn).upsert(new.offer_name, new.discount).await?;

    let voucher = voucher::ActiveModel {
      code: Set(new.code.to_string()),
      customer_id: Set(customer_id),
      special_offer_id: Set(offer_id),
      expired_at: Set(new.expiry),
      used_at: Set(None),
    };

    voucher::Entity::insert(voucher).exec_without_returning(txn).await?;
    Ok(())
  }

  /// Unused, unexpired vouchers of `email`, soonest expiry first.
  pub async fn unredeemed(&self, email: &str) -> Result<Unredeemed> {
    let customer_id = sv::Customer::new(self.db).id_by_email(email).await?;

    let rows: Vec<(String, String)> = voucher::Entity::find()
      .select_only()
      .column_as(voucher::Column::Code, "code")
      .column_as(offer::Column::Name, "offer_name")
      .join(JoinType::InnerJoin, voucher::Relation::Offer.def())
      .filter(voucher::Column::CustomerId.eq(customer_id))
      .filter(voucher::Column::UsedAt.is_null())
      .filter(voucher::Column::ExpiredAt.gt(utils::now()))
      .order_by_asc(voucher::Column::ExpiredAt)
      .order_by_asc(voucher::Column::Code)
      .into_tuple()
      .all(self.db)
      .await?;

    let (codes, offer_names) = rows.into_iter().unzip();
    Ok(Unredeemed { codes, offer_names })
  }
}
