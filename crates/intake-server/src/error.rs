//! Errors raised while turning configuration into a running app.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid utc_offset {0:?}, expected something like \"+07:00\"")]
  InvalidOffset(String),
  #[error("invalid frontend_url {0:?}")]
  InvalidOrigin(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
