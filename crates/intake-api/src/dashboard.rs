//! Handlers for the admin dashboard: the filtered view, period reports and
//! the JSON backup export.
//!
//! All three take a period selection. `granularity` defaults to `day` and a
//! missing `date` means the current day, month or year in the configured
//! zone.

use axum::{
  Json,
  extract::{
    Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
  http::header,
  response::IntoResponse,
};
use intake_core::{
  analyze::ImageAnalyzer,
  dashboard::Dashboard,
  filter::filter_profiles,
  report::{NotificationDispatcher, ReportOutcome, trigger_report},
  store::ProfileStore,
  window::{Granularity, WindowSelector},
};
use serde::Deserialize;

use crate::{AppState, error::ApiError};

/// Query string or JSON body naming a period.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeriodParams {
  #[serde(default)]
  pub granularity: Granularity,
  /// Anchor date, e.g. `2025-01-05` or `2025-01`.
  pub date:        Option<String>,
}

impl PeriodParams {
  fn selector<S, N, A>(self, state: &AppState<S, N, A>) -> WindowSelector {
    match self.date {
      Some(date) => WindowSelector::new(self.granularity, date),
      None => WindowSelector::current(self.granularity, state.today()),
    }
  }
}

// ─── View ─────────────────────────────────────────────────────────────────────

/// `GET /dashboard[?granularity=day|month|year][&date=YYYY-MM-DD]`
pub async fn view<S, N, A>(
  State(state): State<AppState<S, N, A>>,
  params: Result<Query<PeriodParams>, QueryRejection>,
) -> Result<Json<Dashboard>, ApiError>
where
  S: ProfileStore,
  N: NotificationDispatcher,
  A: ImageAnalyzer,
{
  let Query(params) = params?;
  let selector = params.selector(&state);
  let snapshot = state.store.list_profiles().await.map_err(ApiError::store)?;
  Ok(Json(Dashboard::build(&snapshot, selector, &state.tz)))
}

// ─── Report ───────────────────────────────────────────────────────────────────

/// `POST /reports` with body `{"granularity":"month","date":"2025-01-01"}`
///
/// Always answers 200; the outcome says whether the report went out, was
/// refused for an empty period, or failed to dispatch.
pub async fn report<S, N, A>(
  State(state): State<AppState<S, N, A>>,
  params: Result<Json<PeriodParams>, JsonRejection>,
) -> Result<Json<ReportOutcome>, ApiError>
where
  S: ProfileStore,
  N: NotificationDispatcher,
  A: ImageAnalyzer,
{
  let Json(params) = params?;
  let selector = params.selector(&state);
  let snapshot = state.store.list_profiles().await.map_err(ApiError::store)?;
  let window = selector.resolve(&state.tz);
  let matched = filter_profiles(&snapshot, &window);

  let outcome = trigger_report(state.notifier.as_ref(), &matched, &selector, &state.tz).await;
  Ok(Json(outcome))
}

// ─── Export ───────────────────────────────────────────────────────────────────

/// `GET /export[?granularity=..][&date=..]`: every stored profile as a JSON
/// attachment. The period only names the file.
pub async fn export<S, N, A>(
  State(state): State<AppState<S, N, A>>,
  params: Result<Query<PeriodParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ProfileStore,
  N: NotificationDispatcher,
  A: ImageAnalyzer,
{
  let Query(params) = params?;
  let selector = params.selector(&state);
  let profiles = state.store.list_profiles().await.map_err(ApiError::store)?;

  let disposition = format!(
    "attachment; filename=\"{}\"",
    backup_file_name(&selector)
  );
  Ok(([(header::CONTENT_DISPOSITION, disposition)], Json(profiles)))
}

/// `backup_profiles_<granularity>_<anchor>.json`, with the anchor reduced to
/// characters that are safe in a file name.
pub fn backup_file_name(selector: &WindowSelector) -> String {
  let anchor: String = selector
    .anchor_date
    .chars()
    .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
    .collect();
  format!("backup_profiles_{}_{anchor}.json", selector.granularity)
}
