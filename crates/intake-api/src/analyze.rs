//! Handler for `POST /analyze`.
//!
//! Body: `{"base64Image":"data:image/jpeg;base64,..."}`. The data-URL prefix is
//! optional and stripped before the image reaches the analyzer.

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use intake_core::{
  analyze::{ExtractedData, ImageAnalyzer, strip_data_url_prefix},
  report::NotificationDispatcher,
  store::ProfileStore,
};
use serde::Deserialize;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeBody {
  pub base64_image: Option<String>,
}

/// `POST /analyze`
pub async fn handler<S, N, A>(
  State(state): State<AppState<S, N, A>>,
  body: Result<Json<AnalyzeBody>, JsonRejection>,
) -> Result<Json<ExtractedData>, ApiError>
where
  S: ProfileStore,
  N: NotificationDispatcher,
  A: ImageAnalyzer,
{
  let Json(body) = body?;
  let image = body
    .base64_image
    .filter(|s| !s.trim().is_empty())
    .ok_or_else(|| ApiError::BadRequest("base64Image is required".to_owned()))?;

  let data = state
    .analyzer
    .extract(strip_data_url_prefix(&image))
    .await
    .map_err(|e| ApiError::Analysis(Box::new(e)))?;
  Ok(Json(data))
}
