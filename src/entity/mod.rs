//! SeaORM entity definitions

pub mod customer;
pub mod offer;
pub mod voucher;
