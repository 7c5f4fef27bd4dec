//! Error types for `roster-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("student code {0} already exists")]
  DuplicateCode(String),

  #[error("{field} must be between 0 and 10, got {value}")]
  ScoreOutOfRange { field: &'static str, value: f64 },

  #[error("invalid email address: {0:?}")]
  InvalidEmail(String),

  #[error("invalid birth date {0:?}, expected YYYY-MM-DD")]
  InvalidBirthDate(String),

  #[error("{0} must not be empty")]
  MissingField(&'static str),
}

impl Error {
  /// True for errors raised by input validation rather than by the store.
  pub fn is_validation(&self) -> bool { !matches!(self, Self::DuplicateCode(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
