//! Error types for the voucher service

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum Invalid {
  #[error("invalid email `{0}`")]
  Email(String),
  #[error("discount shall be bigger than 0 and at most 100, got {0}")]
  Discount(f64),
  #[error("expiry date shall be in the future")]
  Expiry,
  #[error("offer name shall not be empty")]
  OfferName,
  #[error("{0}")]
  Body(String),
}

#[derive(Debug, Error)]
pub enum Redemption {
  #[error("voucher not found")]
  NotFound,
  #[error("this voucher has been redeemed")]
  AlreadyRedeemed,
  #[error("voucher expired")]
  Expired,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0}")]
  Invalid(#[from] Invalid),

  #[error("customer not found")]
  CustomerNotFound,

  #[error(transparent)]
  Redemption(#[from] Redemption),

  #[error("offer upsert returned no id")]
  OfferUpsert,

  #[error("database error: {0}")]
  Database(#[from] DbErr),

  #[error("{source}; rollback failed: {rollback}")]
  Rollback { source: Box<Error>, rollback: DbErr },

  #[error("inconsistent result: {0}")]
  Inconsistent(String),
}

impl Error {
  pub fn status(&self) -> StatusCode {
    match self {
      Error::Invalid(_) | Error::Redemption(Redemption::AlreadyRedeemed) => {
        StatusCode::BAD_REQUEST
      }
      Error::CustomerNotFound | Error::Redemption(Redemption::NotFound) => {
        StatusCode::NOT_FOUND
      }
      Error::Redemption(Redemption::Expired)
      | Error::OfferUpsert
      | Error::Database(_)
      | Error::Rollback { .. }
      | Error::Inconsistent(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = self.status();

    // storage details stay in the logs
    let message = match &self {
      Error::Database(_) | Error::Rollback { .. } | Error::OfferUpsert => {
        error!("Request failed: {self}");
        String::from("Database error")
      }
      Error::Inconsistent(_) => {
        error!("Request failed: {self}");
        String::from("Internal error")
      }
      _ => {
        warn!("Request rejected: {self}");
        self.to_string()
      }
    };

    let body = json::json!({
      "success": false,
      "error": message
    });

    (status, axum::Json(body)).into_response()
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_rollback_keeps_both_faults() {
    let err = Error::Rollback {
      source: Box::new(Error::Database(DbErr::Custom("insert failed".into()))),
      rollback: DbErr::Custom("connection lost".into()),
    };

    let message = err.to_string();
    assert!(message.contains("insert failed"), "{message}");
    assert!(message.contains("connection lost"), "{message}");
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
  }

  #[test]
  fn test_status_mapping() {
    let cases = [
      (Error::from(Invalid::Email("x".into())), StatusCode::BAD_REQUEST),
      (Invalid::Discount(0.0).into(), StatusCode::BAD_REQUEST),
      (Invalid::Expiry.into(), StatusCode::BAD_REQUEST),
      (Invalid::OfferName.into(), StatusCode::BAD_REQUEST),
      (Invalid::Body("eof".into()).into(), StatusCode::BAD_REQUEST),
      (Redemption::AlreadyRedeemed.into(), StatusCode::BAD_REQUEST),
      (Redemption::NotFound.into(), StatusCode::NOT_FOUND),
      (Error::CustomerNotFound, StatusCode::NOT_FOUND),
      (Redemption::Expired.into(), StatusCode::INTERNAL_SERVER_ERROR),
      (Error::OfferUpsert, StatusCode::INTERNAL_SERVER_ERROR),
      (
        DbErr::Custom("boom".into()).into(),
        StatusCode::INTERNAL_SERVER_ERROR,
      ),
      (
        Error::Inconsistent("2 codes for 1 offer names".into()),
        StatusCode::INTERNAL_SERVER_ERROR,
      ),
    ];

    for (err, status) in cases {
      assert_eq!(err.status(), status, "{err}");
    }
  }

  #[tokio::test]
  async fn test_storage_details_stay_out_of_body() {
    let err = Error::from(DbErr::Custom("secret table".into()));
    let res = err.into_response();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes =
      axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body: json::Value = json::from_slice(&bytes).unwrap();
    assert_eq!(
      body,
      json::json!({ "success": false, "error": "Database error" })
    );
  }
}
