//! HTTP server assembly for the intake service.
//!
//! Mounts the JSON API under `/api` and `/health` at the root, then wraps the
//! whole app in request tracing, CORS for the submission frontend and a
//! request-body limit sized for base64 photos.
//!
//! # Configuration
//!
//! ```toml
//! host          = "0.0.0.0"
//! port          = 3001
//! store_path    = "~/.local/share/intake/intake.db"
//! frontend_url  = "http://localhost:5173"
//! utc_offset    = "+07:00"
//! body_limit_mb = 50
//!
//! [messaging]
//! endpoint     = "https://openapi.example.com/v3.0/oa/message/cs"
//! access_token = "..."
//! recipient_id = "..."
//! ```
//!
//! Every key can be overridden from the environment, e.g. `INTAKE_PORT=8080`
//! or `INTAKE_MESSAGING__ACCESS_TOKEN=...`.

pub mod error;

use std::path::PathBuf;

use axum::{Router, extract::DefaultBodyLimit, http::HeaderValue};
use chrono::{FixedOffset, Local, Offset as _};
use intake_api::{AppState, api_router, health_router};
use intake_core::{
  analyze::ImageAnalyzer, report::NotificationDispatcher, store::ProfileStore,
};
use intake_notify::MessagingConfig;
use serde::Deserialize;
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

pub use error::{Error, Result};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `INTAKE_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:          String,
  #[serde(default = "default_port")]
  pub port:          u16,
  #[serde(default = "default_store_path")]
  pub store_path:    PathBuf,
  /// Origin allowed by CORS. Any origin when unset.
  pub frontend_url:  Option<String>,
  /// Local time for periods and message timestamps, e.g. `+07:00`. The
  /// host's current offset when unset.
  pub utc_offset:    Option<String>,
  #[serde(default = "default_body_limit_mb")]
  pub body_limit_mb: usize,
  pub messaging:     Option<MessagingConfig>,
}

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 3001 }
fn default_store_path() -> PathBuf { PathBuf::from("intake.db") }
fn default_body_limit_mb() -> usize { 50 }

impl ServerConfig {
  /// The configured local offset.
  pub fn tz(&self) -> Result<FixedOffset> {
    match &self.utc_offset {
      Some(raw) => raw
        .trim()
        .parse::<FixedOffset>()
        .map_err(|_| Error::InvalidOffset(raw.clone())),
      None => Ok(Local::now().offset().fix()),
    }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  fn cors(&self) -> Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match &self.frontend_url {
      Some(url) => {
        let origin = HeaderValue::from_str(url.trim_end_matches('/'))
          .map_err(|_| Error::InvalidOrigin(url.clone()))?;
        Ok(layer.allow_origin(origin))
      }
      None => Ok(layer.allow_origin(Any)),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application router.
pub fn app<S, N, A>(state: AppState<S, N, A>, config: &ServerConfig) -> Result<Router>
where
  S: ProfileStore + 'static,
  N: NotificationDispatcher + 'static,
  A: ImageAnalyzer + 'static,
{
  Ok(
    Router::new()
      .nest("/api", api_router(state.clone()))
      .merge(health_router(state))
      .layer(DefaultBodyLimit::max(config.body_limit_mb * 1024 * 1024))
      .layer(config.cors()?)
      .layer(TraceLayer::new_for_http()),
  )
}

// ─── Tests ────────────────────────────────────────────────────────────────────
