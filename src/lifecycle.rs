//! Voucher lifecycle: issue, redeem once, list what is still usable
//!
//! ```text
//! Issued --redeem--> Redeemed
//! Issued --redeem after expiry--> Expired (no transition)
//! Redeemed --redeem--> AlreadyRedeemed (no transition)
//! ```

use serde::Serialize;

use crate::{
  prelude::*,
  sv::{self, NewVoucher},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveVoucher {
  pub code: String,
  pub offer_name: String,
}

pub struct Lifecycle<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Lifecycle<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Redeems `code` for `email` and returns its discount. Only the first
  /// successful call for a code yields the discount.
  pub async fn validate(&self, email: &str, code: &str) -> Result<f64> {
    let store = sv::Voucher::new(self.db);

    if let Some(used_at) = store.redemption_state(email, code).await? {
      debug!("Voucher `{code}` already redeemed at {used_at}");
      return Err(Redemption::AlreadyRedeemed.into());
    }

    let discount = store.redeem(code).await?;
    info!("Voucher `{code}` redeemed by {email} for {discount}%");
    Ok(discount)
  }

  /// Issues a fresh voucher for `email` under `offer_name`, creating the
  /// offer or overwriting its discount.
  pub async fn generate(
    &self,
    email: &str,
    offer_name: &str,
    discount: f64,
    expiry: DateTime,
  ) -> Result<String> {
    if offer_name.trim().is_empty() {
      return Err(Invalid::OfferName.into());
    }
    // NaN fails both comparisons
    if !(discount > 0.0 && discount <= 100.0) {
      return Err(Invalid::Discount(discount).into());
    }
    if expiry <= utils::now() {
      return Err(Invalid::Expiry.into());
    }

    let code = utils::generate_code();
    sv::Voucher::new(self.db)
      .issue(&NewVoucher {
        email,
        offer_name,
        code: &code,
        expiry,
        discount,
      })
      .await?;

    info!(
      "Issued voucher `{code}` ({offer_name}, {discount}%) to {email}, \
       expires {}",
      utils::format_date(expiry)
    );
    Ok(code)
  }

  pub async fn active(&self, email: &str) -> Result<Vec<ActiveVoucher>> {
    let sv::Unredeemed { codes, offer_names } =
      sv::Voucher::new(self.db).unredeemed(email).await?;

    if codes.len() != offer_names.len() {
      return Err(Error::Inconsistent(format!(
        "{} codes for {} offer names",
        codes.len(),
        offer_names.len()
      )));
    }

    Ok(
      codes
        .into_iter()
        .zip(offer_names)
        .map(|(code, offer_name)| ActiveVoucher { code, offer_name })
        .collect(),
    )
  }
}
