//! Handler for `GET /health`.

use axum::{Json, extract::State};
use chrono::Utc;
use intake_core::{
  analyze::ImageAnalyzer, report::NotificationDispatcher, store::ProfileStore,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
  pub status:         String,
  /// RFC 3339, UTC.
  pub timestamp:      String,
  pub profiles_count: u64,
}

/// `GET /health`
pub async fn handler<S, N, A>(
  State(state): State<AppState<S, N, A>>,
) -> Result<Json<Health>, ApiError>
where
  S: ProfileStore,
  N: NotificationDispatcher,
  A: ImageAnalyzer,
{
  let profiles_count = state.store.count_profiles().await.map_err(ApiError::store)?;
  Ok(Json(Health {
    status: "OK".to_owned(),
    timestamp: Utc::now().to_rfc3339(),
    profiles_count,
  }))
}
