//! The `ProfileStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `intake-store-sqlite`).
//! Higher layers (`intake-api`, `intake-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::profile::{Profile, ProfileStatus};

/// Classification every store error offers to callers that cannot see the
/// concrete backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The write clashed with an existing profile or photo id.
  fn is_conflict(&self) -> bool { false }
}

/// Abstraction over a profile store backend.
///
/// A profile and its photos are written together: either every row lands or
/// none does. Deleting a profile removes its photos in the same unit of work.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ProfileStore: Send + Sync {
  type Error: StoreError;

  /// Persist a new profile together with all of its photos.
  ///
  /// Returns a conflict error if the profile id, or any photo id, is already
  /// stored; nothing is written in that case.
  fn create_profile(
    &self,
    profile: Profile,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  /// The full snapshot: every profile, newest first, photos in upload order.
  fn list_profiles(
    &self,
  ) -> impl Future<Output = Result<Vec<Profile>, Self::Error>> + Send + '_;

  /// Retrieve a profile by id. Returns `None` if not found.
  fn get_profile<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + 'a;

  /// Set the review status. Returns `false` if no such profile exists.
  fn update_status<'a>(
    &'a self,
    id: &'a str,
    status: ProfileStatus,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Delete a profile and all of its photos. Returns `false` if no such
  /// profile exists.
  fn delete_profile<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Delete one photo from a profile. Returns `false` if the photo does not
  /// exist or belongs to another profile.
  fn delete_photo<'a>(
    &'a self,
    profile_id: &'a str,
    photo_id: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Remove every profile and photo.
  fn clear_all(
    &self,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Number of stored profiles.
  fn count_profiles(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
