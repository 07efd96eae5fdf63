//! JSON REST API for the intake service.
//!
//! Exposes axum [`Router`]s backed by any
//! [`ProfileStore`](intake_core::store::ProfileStore), any
//! [`NotificationDispatcher`](intake_core::report::NotificationDispatcher)
//! and any [`ImageAnalyzer`](intake_core::analyze::ImageAnalyzer).
//! TLS, CORS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! Router::new()
//!   .nest("/api", intake_api::api_router(state.clone()))
//!   .merge(intake_api::health_router(state))
//! ```

pub mod analyze;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod profiles;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, patch, post},
};
use chrono::{FixedOffset, NaiveDate, Utc};
use intake_core::{
  analyze::ImageAnalyzer, report::NotificationDispatcher, store::ProfileStore,
};

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Collaborators shared by every handler.
pub struct AppState<S, N, A> {
  pub store:    Arc<S>,
  pub notifier: Arc<N>,
  pub analyzer: Arc<A>,
  /// Local time for window resolution and labels.
  pub tz:       FixedOffset,
}

impl<S, N, A> AppState<S, N, A> {
  pub fn new(store: S, notifier: N, analyzer: A, tz: FixedOffset) -> Self {
    Self {
      store: Arc::new(store),
      notifier: Arc::new(notifier),
      analyzer: Arc::new(analyzer),
      tz,
    }
  }

  /// Today's calendar date in the configured zone.
  pub fn today(&self) -> NaiveDate { Utc::now().with_timezone(&self.tz).date_naive() }
}

impl<S, N, A> Clone for AppState<S, N, A> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      notifier: Arc::clone(&self.notifier),
      analyzer: Arc::clone(&self.analyzer),
      tz:       self.tz,
    }
  }
}

// ─── Routers ──────────────────────────────────────────────────────────────────

/// Build the `/api` router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, N, A>(state: AppState<S, N, A>) -> Router<()>
where
  S: ProfileStore + 'static,
  N: NotificationDispatcher + 'static,
  A: ImageAnalyzer + 'static,
{
  Router::new()
    // Profiles
    .route(
      "/profiles",
      get(profiles::list::<S, N, A>)
        .post(profiles::create::<S, N, A>)
        .delete(profiles::clear::<S, N, A>),
    )
    .route(
      "/profiles/{id}",
      get(profiles::get_one::<S, N, A>).delete(profiles::delete_one::<S, N, A>),
    )
    .route("/profiles/{id}/status", patch(profiles::update_status::<S, N, A>))
    .route(
      "/profiles/{id}/photos/{photo_id}",
      delete(profiles::delete_photo::<S, N, A>),
    )
    // Admin dashboard
    .route("/dashboard", get(dashboard::view::<S, N, A>))
    .route("/reports", post(dashboard::report::<S, N, A>))
    .route("/export", get(dashboard::export::<S, N, A>))
    // Image understanding
    .route("/analyze", post(analyze::handler::<S, N, A>))
    .with_state(state)
}

/// Build the root-level `/health` router.
pub fn health_router<S, N, A>(state: AppState<S, N, A>) -> Router<()>
where
  S: ProfileStore + 'static,
  N: NotificationDispatcher + 'static,
  A: ImageAnalyzer + 'static,
{
  Router::new()
    .route("/health", get(health::handler::<S, N, A>))
    .with_state(state)
}

#[cfg(test)]
mod tests;
