//! Error types for `intake-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown profile status: {0:?}")]
  UnknownStatus(String),

  #[error("unknown window granularity: {0:?}")]
  UnknownGranularity(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
