use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

use crate::prelude::*;

/// Length of every generated voucher code.
pub const CODE_LEN: usize = 8;

const CODE_ALPHABET: &[u8] =
  b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Longest address accepted by SMTP (RFC 5321 forward-path minus brackets).
const MAX_EMAIL_LEN: usize = 254;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
  )
  .expect("email pattern is valid")
});

/// Current time as stored in the database (naive UTC).
pub fn now() -> DateTime {
  Utc::now().naive_utc()
}

/// Random voucher code drawn uniformly from ASCII letters.
///
/// Uses the thread-local CSPRNG, which is seeded once per thread.
pub fn generate_code() -> String {
  let mut rng = rand::thread_rng();
  (0..CODE_LEN)
    .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
    .collect()
}

pub fn validate_email(email: &str) -> Result<(), Invalid> {
  if email.len() > MAX_EMAIL_LEN || !EMAIL.is_match(email) {
    return Err(Invalid::Email(email.to_string()));
  }
  Ok(())
}

pub fn format_date(date: DateTime) -> String {
  date.format("%d.%m.%Y %H:%M").to_string()
}
