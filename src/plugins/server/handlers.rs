use axum::{
  Json,
  extract::{
    Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
  http::StatusCode,
};
use chrono::DateTime as UtcDateTime;
use serde::{Deserialize, Serialize};

use crate::{lifecycle::ActiveVoucher, prelude::*, state::AppState};

#[derive(Debug, Deserialize)]
pub struct ValidateReq {
  pub code: String,
  pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateRes {
  pub discount: f64,
}

#[derive(Debug, Deserialize)]
pub struct GenerateReq {
  pub email: String,
  pub offer_name: String,
  pub discount: f64,
  /// RFC 3339 timestamp
  pub expiry: UtcDateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct GenerateRes {
  pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
  pub email: String,
}

fn malformed(rejection: impl std::fmt::Display) -> Error {
  Invalid::Body(rejection.to_string()).into()
}

pub async fn validate(
  State(app): State<Arc<AppState>>,
  req: Result<Json<ValidateReq>, JsonRejection>,
) -> Result<(StatusCode, Json<ValidateRes>)> {
  let Json(req) = req.map_err(malformed)?;
  utils::validate_email(&req.email)?;

  let discount = app.lifecycle().validate(&req.email, &req.code).await?;
  Ok((StatusCode::CREATED, Json(ValidateRes { discount })))
}

pub async fn generate(
  State(app): State<Arc<AppState>>,
  req: Result<Json<GenerateReq>, JsonRejection>,
) -> Result<Json<GenerateRes>> {
  let Json(req) = req.map_err(malformed)?;
  utils::validate_email(&req.email)?;

  let code = app
    .lifecycle()
    .generate(
      &req.email,
      &req.offer_name,
      req.discount,
      req.expiry.naive_utc(),
    )
    .await?;

  Ok(Json(GenerateRes { code }))
}

pub async fn list(
  State(app): State<Arc<AppState>>,
  query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<ActiveVoucher>>> {
  let Query(query) = query.map_err(malformed)?;
  utils::validate_email(&query.email)?;

  Ok(Json(app.lifecycle().active(&query.email).await?))
}

pub async fn health() -> &'static str {
  "OK"
}

#[cfg(test)]
mod tests {
  use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
  };
  use json::{Value, json};
  use tower::ServiceExt;

  use super::super::router;
  use crate::{state::Config, testing};

  use super::*;

  async fn setup() -> Router {
    let db = testing::setup_test_db().await;
    testing::seed_customer(&db, "a@x.com").await;
    router(Arc::new(AppState::with_db(db, Config::default())))
  }

  fn post(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap()
  }

  fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
  }

  async fn body_json(res: Response<Body>) -> Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    json::from_slice(&bytes).unwrap()
  }

  fn tomorrow() -> String {
    (Utc::now() + TimeDelta::days(1)).to_rfc3339()
  }

  fn generate_body(email: &str, discount: Value, expiry: &str) -> Value {
    json!({
      "email": email,
      "offer_name": "S1",
      "discount": discount,
      "expiry": expiry,
    })
  }

  async fn generate_code(
    router: &Router,
    offer: &str,
    discount: f64,
  ) -> String {
    let res = router
      .clone()
      .oneshot(post(
        "/vouchers/generate",
        json!({
          "email": "a@x.com",
          "offer_name": offer,
          "discount": discount,
          "expiry": tomorrow(),
        }),
      ))
      .await
      .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    body_json(res).await["code"].as_str().unwrap().to_string()
  }

  #[tokio::test]
  async fn test_generate_validate_twice() {
    let router = setup().await;
    let code = generate_code(&router, "S1", 50.0).await;
    assert_eq!(code.len(), utils::CODE_LEN);

    let validate = json!({ "code": code, "email": "a@x.com" });

    let res =
      router.clone().oneshot(post("/vouchers/validate", validate.clone()));
    let res = res.await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(body_json(res).await, json!({ "discount": 50.0 }));

    let res = router.oneshot(post("/vouchers/validate", validate)).await;
    let res = res.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
      body_json(res).await,
      json!({ "success": false, "error": "this voucher has been redeemed" })
    );
  }

  #[tokio::test]
  async fn test_generate_rejects_bad_input() {
    let router = setup().await;

    let tomorrow = tomorrow();
    let cases = [
      generate_body("not-an-email", json!(10.0), &tomorrow),
      generate_body("a@x.com", json!(0.0), &tomorrow),
      generate_body("a@x.com", json!(100.5), &tomorrow),
      generate_body("a@x.com", json!(10.0), "2020-01-01T00:00:00Z"),
      generate_body("a@x.com", json!("ten"), &tomorrow),
      json!({ "email": "a@x.com" }),
    ];

    for body in cases {
      let req = post("/vouchers/generate", body.clone());
      let status = router.clone().oneshot(req).await.unwrap().status();
      assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    }
  }

  #[tokio::test]
  async fn test_generate_unknown_customer() {
    let router = setup().await;

    let res = router
      .oneshot(post(
        "/vouchers/generate",
        json!({
          "email": "nobody@x.com",
          "offer_name": "S1",
          "discount": 10.0,
          "expiry": tomorrow(),
        }),
      ))
      .await
      .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn test_validate_bad_input() {
    let router = setup().await;

    let body = json!({ "code": "x", "email": "bad" });
    let res =
      router.clone().oneshot(post("/vouchers/validate", body)).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = router
      .oneshot(
        Request::post("/vouchers/validate")
          .header(header::CONTENT_TYPE, "application/json")
          .body(Body::from("{not json"))
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn test_validate_unknown_code() {
    let router = setup().await;

    let res = router
      .oneshot(post(
        "/vouchers/validate",
        json!({ "code": "Nothing1", "email": "a@x.com" }),
      ))
      .await
      .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn test_validate_expired() {
    let db = testing::setup_test_db().await;
    let customer = testing::seed_customer(&db, "a@x.com").await;
    let past = utils::now() - TimeDelta::minutes(5);
    testing::insert_voucher(&db, customer, "S1", "OldCode", past, None).await;
    let router = router(Arc::new(AppState::with_db(db, Config::default())));

    let res = router
      .oneshot(post(
        "/vouchers/validate",
        json!({ "code": "OldCode", "email": "a@x.com" }),
      ))
      .await
      .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
      body_json(res).await,
      json!({ "success": false, "error": "voucher expired" })
    );
  }

  #[tokio::test]
  async fn test_list_active() {
    let router = setup().await;
    let redeemed = generate_code(&router, "S1", 50.0).await;
    let open = generate_code(&router, "S2", 30.0).await;

    let res = router
      .clone()
      .oneshot(post(
        "/vouchers/validate",
        json!({ "code": redeemed, "email": "a@x.com" }),
      ))
      .await
      .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = router.clone().oneshot(get("/vouchers?email=a@x.com")).await;
    let res = res.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
      body_json(res).await,
      json!([{ "code": open, "offer_name": "S2" }])
    );

    let res = router.clone().oneshot(get("/vouchers?email=bad")).await;
    assert_eq!(res.unwrap().status(), StatusCode::BAD_REQUEST);

    let res = router.oneshot(get("/vouchers")).await;
    assert_eq!(res.unwrap().status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn test_health() {
    let router = setup().await;

    let res = router.oneshot(get("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
  }
}
