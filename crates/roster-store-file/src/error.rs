//! Error type for `roster-store-file`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] roster_core::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// A row in the backing file could not be decoded.
  #[error("{}:{line}: malformed record: {source}", path.display())]
  Corrupt {
    path:   PathBuf,
    line:   usize,
    #[source]
    source: serde_json::Error,
  },

  #[error("{}: duplicate id {id}", path.display())]
  DuplicateId { path: PathBuf, id: u64 },
}

impl roster_core::store::StoreError for Error {
  fn as_core(&self) -> Option<&roster_core::Error> {
    match self {
      Error::Core(e) => Some(e),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
