//! Router tests against an in-memory `SqliteStore`.

use std::sync::{Arc, Mutex};

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use chrono::{FixedOffset, TimeZone};
use intake_core::{
  analyze::{ExtractedData, ImageAnalyzer},
  profile::Profile,
  report::{NotificationDispatcher, ReportSummary},
};
use intake_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{AppState, api_router, health_router};

// ─── Fakes ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("channel down")]
struct ChannelDown;

/// Records what it was asked to send; fails every call when `fail` is set.
#[derive(Default)]
struct Recorder {
  fail:    bool,
  created: Mutex<Vec<String>>,
  reports: Mutex<Vec<ReportSummary>>,
}

impl NotificationDispatcher for Recorder {
  type Error = ChannelDown;

  async fn profile_created(&self, profile: &Profile) -> Result<(), ChannelDown> {
    self.created.lock().unwrap().push(profile.id.clone());
    if self.fail { Err(ChannelDown) } else { Ok(()) }
  }

  async fn send_report(&self, summary: &ReportSummary) -> Result<(), ChannelDown> {
    self.reports.lock().unwrap().push(summary.clone());
    if self.fail { Err(ChannelDown) } else { Ok(()) }
  }
}

/// Echoes the payload it received back as the student name.
struct EchoAnalyzer;

impl ImageAnalyzer for EchoAnalyzer {
  type Error = std::convert::Infallible;

  async fn extract(&self, image_base64: &str) -> Result<ExtractedData, Self::Error> {
    Ok(ExtractedData {
      student_name:  Some(image_base64.to_owned()),
      student_phone: None,
    })
  }
}

// ─── Harness ──────────────────────────────────────────────────────────────────

fn tz() -> FixedOffset { FixedOffset::east_opt(7 * 3600).unwrap() }

fn at(y: i32, mo: u32, d: u32, h: u32) -> i64 {
  tz()
    .with_ymd_and_hms(y, mo, d, h, 0, 0)
    .single()
    .unwrap()
    .timestamp_millis()
}

/// The app plus a handle on the notifier it dispatches through.
async fn app_with(recorder: Recorder) -> (Router, Arc<Recorder>) {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let state = AppState::new(store, recorder, EchoAnalyzer, tz());
  let recorder = Arc::clone(&state.notifier);
  let app = Router::new()
    .nest("/api", api_router(state.clone()))
    .merge(health_router(state));
  (app, recorder)
}

async fn app() -> Router { app_with(Recorder::default()).await.0 }

fn failing() -> Recorder { Recorder { fail: true, ..Default::default() } }

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
  let (status, _, bytes) = send_raw(app, method, uri, body).await;
  let json = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, json)
}

async fn send_raw(
  app: &Router,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
  let status = resp.status();
  let headers = resp.headers().clone();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  (status, headers, bytes.to_vec())
}

fn submission(id: &str, collaborator: &str, timestamp: i64) -> Value {
  json!({
    "id": id,
    "collaboratorName": collaborator,
    "studentName": "Tran Thi Mai",
    "studentPhone": "0912345678",
    "notes": "",
    "timestamp": timestamp,
    "status": "pending",
    "photos": [
      { "id": format!("{id}-1"), "data": "data:image/jpeg;base64,AAAA", "createdAt": timestamp }
    ]
  })
}

// ─── Profiles ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_list_and_get_profile() {
  let (app, recorder) = app_with(Recorder::default()).await;

  let (status, body) = send(&app, "POST", "/api/profiles", Some(submission("p1", "Lan", at(2025, 1, 5, 9)))).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["success"], true);
  assert_eq!(body["profile"]["collaboratorName"], "Lan");
  assert_eq!(*recorder.created.lock().unwrap(), ["p1"]);

  let (status, body) = send(&app, "GET", "/api/profiles", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 1);

  let (status, body) = send(&app, "GET", "/api/profiles/p1", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["photos"][0]["id"], "p1-1");
}

#[tokio::test]
async fn get_missing_profile_returns_404() {
  let app = app().await;
  let (status, body) = send(&app, "GET", "/api/profiles/nope", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn create_without_photos_or_phone_is_rejected() {
  let (app, recorder) = app_with(Recorder::default()).await;

  let mut body = submission("p1", "Lan", 0);
  body["photos"] = json!([]);
  body["studentPhone"] = json!("");
  let (status, resp) = send(&app, "POST", "/api/profiles", Some(body)).await;

  assert_eq!(status, StatusCode::BAD_REQUEST);
  let message = resp["error"].as_str().unwrap();
  assert!(message.contains("studentPhone") && message.contains("photos"), "{message}");
  assert!(recorder.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_create_returns_409() {
  let app = app().await;
  send(&app, "POST", "/api/profiles", Some(submission("p1", "Lan", 0))).await;

  let mut again = submission("p1", "Hoa", 0);
  again["photos"][0]["id"] = json!("other");
  let (status, _) = send(&app, "POST", "/api/profiles", Some(again)).await;
  assert_eq!(status, StatusCode::CONFLICT);

  let (_, body) = send(&app, "GET", "/api/profiles/p1", None).await;
  assert_eq!(body["collaboratorName"], "Lan");
}

#[tokio::test]
async fn create_with_absent_keys_answers_json_400() {
  let (app, recorder) = app_with(Recorder::default()).await;

  for key in ["studentName", "timestamp"] {
    let mut body = submission("p1", "Lan", 0);
    body.as_object_mut().unwrap().remove(key);
    let (status, resp) = send(&app, "POST", "/api/profiles", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "without {key}");
    let message = resp["error"].as_str().unwrap();
    assert!(message.contains(key), "{message}");
  }
  assert!(recorder.created.lock().unwrap().is_empty());

  let (status, resp) = send(&app, "PATCH", "/api/profiles/p1/status", Some(json!({}))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(resp["error"].is_string());
}

#[tokio::test]
async fn photo_id_owned_by_another_profile_is_a_conflict() {
  let app = app().await;
  send(&app, "POST", "/api/profiles", Some(submission("p1", "Lan", 0))).await;

  let mut clash = submission("p2", "Hoa", 0);
  clash["photos"][0]["id"] = json!("p1-1");
  let (status, body) = send(&app, "POST", "/api/profiles", Some(clash)).await;

  assert_eq!(status, StatusCode::CONFLICT);
  assert!(body["error"].as_str().unwrap().contains("p1-1"));
  let (status, _) = send(&app, "GET", "/api/profiles/p2", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn failed_notification_keeps_profile() {
  let (app, recorder) = app_with(failing()).await;

  let (status, _) = send(&app, "POST", "/api/profiles", Some(submission("p1", "Lan", 0))).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(recorder.created.lock().unwrap().len(), 1);

  let (status, _) = send(&app, "GET", "/api/profiles/p1", None).await;
  assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn update_status_validates_and_applies() {
  let app = app().await;
  send(&app, "POST", "/api/profiles", Some(submission("p1", "Lan", 0))).await;

  let (status, _) = send(&app, "PATCH", "/api/profiles/p1/status", Some(json!({ "status": "archived" }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _) = send(&app, "PATCH", "/api/profiles/nope/status", Some(json!({ "status": "approved" }))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, body) = send(&app, "PATCH", "/api/profiles/p1/status", Some(json!({ "status": "approved" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["success"], true);

  let (_, body) = send(&app, "GET", "/api/profiles/p1", None).await;
  assert_eq!(body["status"], "approved");
}

#[tokio::test]
async fn delete_photo_then_profile() {
  let app = app().await;
  send(&app, "POST", "/api/profiles", Some(submission("p1", "Lan", 0))).await;

  let (status, _) = send(&app, "DELETE", "/api/profiles/p1/photos/missing", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _) = send(&app, "DELETE", "/api/profiles/p1/photos/p1-1", None).await;
  assert_eq!(status, StatusCode::OK);
  let (_, body) = send(&app, "GET", "/api/profiles/p1", None).await;
  assert!(body["photos"].as_array().unwrap().is_empty());

  let (status, _) = send(&app, "DELETE", "/api/profiles/p1", None).await;
  assert_eq!(status, StatusCode::OK);
  let (status, _) = send(&app, "DELETE", "/api/profiles/p1", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn clear_all_and_health_count() {
  let app = app().await;
  send(&app, "POST", "/api/profiles", Some(submission("p1", "Lan", 0))).await;
  send(&app, "POST", "/api/profiles", Some(submission("p2", "Hoa", 0))).await;

  let (status, body) = send(&app, "GET", "/health", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "OK");
  assert_eq!(body["profilesCount"], 2);

  let (status, _) = send(&app, "DELETE", "/api/profiles", None).await;
  assert_eq!(status, StatusCode::OK);
  let (_, body) = send(&app, "GET", "/health", None).await;
  assert_eq!(body["profilesCount"], 0);
}

// ─── Dashboard ────────────────────────────────────────────────────────────────

async fn seeded(recorder: Recorder) -> (Router, Arc<Recorder>) {
  let (app, recorder) = app_with(recorder).await;
  for (id, who, ts) in [
    ("p1", "A", at(2025, 1, 5, 9)),
    ("p2", "B", at(2025, 1, 5, 12)),
    ("p3", "A", at(2025, 1, 5, 18)),
    ("p4", "B", at(2025, 1, 20, 8)),
    ("p5", "C", at(2025, 2, 1, 8)),
  ] {
    send(&app, "POST", "/api/profiles", Some(submission(id, who, ts))).await;
  }
  (app, recorder)
}

#[tokio::test]
async fn dashboard_filters_day_and_ranks_collaborators() {
  let (app, _) = seeded(Recorder::default()).await;

  let (status, body) = send(&app, "GET", "/api/dashboard?granularity=day&date=2025-01-05", None).await;
  assert_eq!(status, StatusCode::OK);

  let ids: Vec<_> = body["profiles"]
    .as_array()
    .unwrap()
    .iter()
    .map(|p| p["id"].as_str().unwrap())
    .collect();
  assert_eq!(ids, ["p3", "p2", "p1"]);
  assert_eq!(body["stats"][0], json!({ "name": "A", "count": 2, "lastTime": at(2025, 1, 5, 18) }));
  assert_eq!(body["stats"][1]["name"], "B");
  assert_eq!(body["chart"]["data"], json!([2, 1]));
  assert!(body["emptyMessage"].is_null());
}

#[tokio::test]
async fn dashboard_month_and_empty_state() {
  let (app, _) = seeded(Recorder::default()).await;

  let (_, body) = send(&app, "GET", "/api/dashboard?granularity=month&date=2025-01", None).await;
  assert_eq!(body["profiles"].as_array().unwrap().len(), 4);
  assert_eq!(body["stats"][0]["count"], 2);

  let (_, body) = send(&app, "GET", "/api/dashboard?granularity=year&date=2024-06-01", None).await;
  assert!(body["profiles"].as_array().unwrap().is_empty());
  assert_eq!(body["emptyMessage"], "No records for year 2024");

  let (status, body) = send(&app, "GET", "/api/dashboard?granularity=day&date=not-a-date", None).await;
  assert_eq!(status, StatusCode::OK);
  assert!(body["profiles"].as_array().unwrap().is_empty());
  assert_eq!(body["window"]["kind"], "empty");
}

#[tokio::test]
async fn unknown_granularity_answers_json_400() {
  let app = app().await;

  for uri in ["/api/dashboard?granularity=week", "/api/export?granularity=week"] {
    let (status, body) = send(&app, "GET", uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    assert!(body["error"].as_str().unwrap().starts_with("invalid query"), "{uri}");
  }

  let (status, body) =
    send(&app, "POST", "/api/reports", Some(json!({ "granularity": "week" }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().starts_with("invalid request body"));
}

// ─── Reports ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn report_for_empty_period_never_dispatches() {
  let (app, recorder) = seeded(Recorder::default()).await;

  let (status, body) = send(
    &app,
    "POST",
    "/api/reports",
    Some(json!({ "granularity": "day", "date": "2025-03-01" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["outcome"], "rejected");
  assert!(recorder.reports.lock().unwrap().is_empty());
}

#[tokio::test]
async fn report_sends_only_the_filtered_subset() {
  let (app, recorder) = seeded(Recorder::default()).await;

  let (_, body) = send(
    &app,
    "POST",
    "/api/reports",
    Some(json!({ "granularity": "day", "date": "2025-01-05" })),
  )
  .await;
  assert_eq!(body, json!({ "outcome": "sent", "message": "Report sent" }));

  let reports = recorder.reports.lock().unwrap();
  assert_eq!(reports.len(), 1);
  assert_eq!(reports[0].profile_count, 3);
  assert_eq!(reports[0].collaborator_count, 2);
  assert_eq!(reports[0].period_label, "day 5/1/2025");
}

#[tokio::test]
async fn report_dispatch_failure_is_reported_not_raised() {
  let (app, _) = seeded(failing()).await;

  let (status, body) = send(
    &app,
    "POST",
    "/api/reports",
    Some(json!({ "granularity": "month", "date": "2025-01-01" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["outcome"], "failed");

  // Local state is untouched.
  let (_, body) = send(&app, "GET", "/api/profiles", None).await;
  assert_eq!(body.as_array().unwrap().len(), 5);
}

// ─── Export / analyze ─────────────────────────────────────────────────────────

#[tokio::test]
async fn export_returns_all_profiles_as_attachment() {
  let (app, _) = seeded(Recorder::default()).await;
  let (status, headers, bytes) =
    send_raw(&app, "GET", "/api/export?granularity=month&date=2025-01-01", None).await;

  assert_eq!(status, StatusCode::OK);
  let disposition = headers.get(header::CONTENT_DISPOSITION).unwrap().to_str().unwrap();
  assert_eq!(disposition, "attachment; filename=\"backup_profiles_month_2025-01-01.json\"");
  let profiles: Vec<Profile> = serde_json::from_slice(&bytes).unwrap();
  assert_eq!(profiles.len(), 5);
}

#[tokio::test]
async fn analyze_strips_prefix_and_requires_image() {
  let app = app().await;

  let (status, body) = send(
    &app,
    "POST",
    "/api/analyze",
    Some(json!({ "base64Image": "data:image/png;base64,QUJD" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "studentName": "QUJD" }));

  let (status, body) = send(&app, "POST", "/api/analyze", Some(json!({}))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "base64Image is required");

  let (status, body) =
    send(&app, "POST", "/api/analyze", Some(json!({ "base64Image": 42 }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().starts_with("invalid request body"));
}
