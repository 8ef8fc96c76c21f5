//! Voucher Pool - issues, validates and redeems single-use discount vouchers
//!
//! Architecture:
//! - SeaORM for database access (SQLite), schema from the `migration` crate
//! - `sv` is the voucher store, `lifecycle` enforces the redemption rules
//! - Axum for the HTTP API with rate limiting, run as a supervised plugin
//! - Tokio for async runtime

pub mod entity;
pub mod error;
pub mod lifecycle;
pub mod plugins;
pub mod prelude;
pub mod state;
pub mod sv;
pub mod utils;

#[cfg(test)]
mod testing;
