//! Error type for `intake-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] intake_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A profile with this id is already stored.
  #[error("profile already exists: {0}")]
  DuplicateProfile(String),

  /// A photo with this id is already stored, on this or another profile.
  #[error("photo already exists: {0}")]
  DuplicatePhoto(String),
}

impl intake_core::store::StoreError for Error {
  fn is_conflict(&self) -> bool {
    matches!(self, Self::DuplicateProfile(_) | Self::DuplicatePhoto(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
