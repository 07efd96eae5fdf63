//! Handlers for `/profiles` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/profiles` | Full snapshot, newest first |
//! | `POST`   | `/profiles` | Body: [`Profile`]; returns 201, notifies the admin |
//! | `DELETE` | `/profiles` | Remove every profile and photo |
//! | `GET`    | `/profiles/{id}` | 404 if not found |
//! | `DELETE` | `/profiles/{id}` | Deletes the profile and its photos |
//! | `PATCH`  | `/profiles/{id}/status` | Body: `{"status":"approved"}` |
//! | `DELETE` | `/profiles/{id}/photos/{photo_id}` | 404 if not found |

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use intake_core::{
  analyze::ImageAnalyzer,
  profile::{Profile, ProfileStatus},
  report::NotificationDispatcher,
  store::ProfileStore,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{AppState, error::ApiError};

fn success() -> Json<Value> { Json(json!({ "success": true })) }

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /profiles`
pub async fn list<S, N, A>(
  State(state): State<AppState<S, N, A>>,
) -> Result<Json<Vec<Profile>>, ApiError>
where
  S: ProfileStore,
  N: NotificationDispatcher,
  A: ImageAnalyzer,
{
  let profiles = state.store.list_profiles().await.map_err(ApiError::store)?;
  Ok(Json(profiles))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /profiles/{id}`
pub async fn get_one<S, N, A>(
  State(state): State<AppState<S, N, A>>,
  Path(id): Path<String>,
) -> Result<Json<Profile>, ApiError>
where
  S: ProfileStore,
  N: NotificationDispatcher,
  A: ImageAnalyzer,
{
  let profile = state
    .store
    .get_profile(&id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("profile {id} not found")))?;
  Ok(Json(profile))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// Response body for a successful submission.
#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
  pub success: bool,
  pub profile: Profile,
}

/// `POST /profiles`, answering 201 with the stored profile.
///
/// The admin notification is sent after the write. If it fails the profile
/// stays stored and the request still succeeds.
pub async fn create<S, N, A>(
  State(state): State<AppState<S, N, A>>,
  profile: Result<Json<Profile>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ProfileStore,
  N: NotificationDispatcher,
  A: ImageAnalyzer,
{
  let Json(profile) = profile?;
  let missing = profile.missing_fields();
  if !missing.is_empty() {
    return Err(ApiError::BadRequest(format!(
      "missing required fields: {}",
      missing.join(", ")
    )));
  }

  let existing = state
    .store
    .get_profile(&profile.id)
    .await
    .map_err(ApiError::store)?;
  if existing.is_some() {
    return Err(ApiError::Conflict(format!(
      "profile {} already exists",
      profile.id
    )));
  }

  let stored = state
    .store
    .create_profile(profile)
    .await
    .map_err(ApiError::store)?;

  if let Err(e) = state.notifier.profile_created(&stored).await {
    tracing::warn!(profile_id = %stored.id, error = %e, "new-profile notification failed");
  }

  Ok((StatusCode::CREATED, Json(Created { success: true, profile: stored })))
}

// ─── Status ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: String,
}

/// `PATCH /profiles/{id}/status` with body `{"status":"approved"}`
pub async fn update_status<S, N, A>(
  State(state): State<AppState<S, N, A>>,
  Path(id): Path<String>,
  body: Result<Json<StatusBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError>
where
  S: ProfileStore,
  N: NotificationDispatcher,
  A: ImageAnalyzer,
{
  let Json(body) = body?;
  let status: ProfileStatus = body
    .status
    .parse()
    .map_err(|_| ApiError::BadRequest(format!("invalid status {:?}", body.status)))?;

  let updated = state
    .store
    .update_status(&id, status)
    .await
    .map_err(ApiError::store)?;
  if !updated {
    return Err(ApiError::NotFound(format!("profile {id} not found")));
  }
  Ok(success())
}

// ─── Deletes ──────────────────────────────────────────────────────────────────

/// `DELETE /profiles/{id}`
pub async fn delete_one<S, N, A>(
  State(state): State<AppState<S, N, A>>,
  Path(id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: ProfileStore,
  N: NotificationDispatcher,
  A: ImageAnalyzer,
{
  let deleted = state
    .store
    .delete_profile(&id)
    .await
    .map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("profile {id} not found")));
  }
  Ok(success())
}

/// `DELETE /profiles/{id}/photos/{photo_id}`
pub async fn delete_photo<S, N, A>(
  State(state): State<AppState<S, N, A>>,
  Path((profile_id, photo_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError>
where
  S: ProfileStore,
  N: NotificationDispatcher,
  A: ImageAnalyzer,
{
  let deleted = state
    .store
    .delete_photo(&profile_id, &photo_id)
    .await
    .map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!(
      "photo {photo_id} not found on profile {profile_id}"
    )));
  }
  Ok(success())
}

/// `DELETE /profiles`
pub async fn clear<S, N, A>(
  State(state): State<AppState<S, N, A>>,
) -> Result<Json<Value>, ApiError>
where
  S: ProfileStore,
  N: NotificationDispatcher,
  A: ImageAnalyzer,
{
  state.store.clear_all().await.map_err(ApiError::store)?;
  Ok(success())
}
