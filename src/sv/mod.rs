//! Voucher store: transactional access to customers, offers and vouchers

pub mod customer;
pub mod offer;
pub mod voucher;

pub use customer::Customer;
pub use offer::Offer;
pub use voucher::{NewVoucher, Unredeemed, Voucher};

use crate::prelude::*;

/// Rolls `txn` back after `err`. When the rollback fails as well, both
/// faults are kept in the returned error.
pub(crate) async fn rollback(
  txn: DatabaseTransaction,
  err: impl Into<Error>,
) -> Error {
  let err = err.into();
  match txn.rollback().await {
    Ok(()) => err,
    Err(rollback) => {
      error!("Rollback after `{err}` failed: {rollback}");
      Error::Rollback { source: Box::new(err), rollback }
    }
  }
}
