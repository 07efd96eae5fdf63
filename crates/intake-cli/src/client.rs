//! Async HTTP client wrapping the intake JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use intake_core::{
  dashboard::Dashboard,
  profile::{Profile, ProfileStatus},
  report::ReportOutcome,
  window::Granularity,
};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{Value, json};

/// Connection settings for the intake API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url:     String,
  pub timeout_secs: u64,
}

/// A period selection as sent to the server. `date: None` lets the server
/// pick the current period in its own zone.
#[derive(Debug, Clone)]
pub struct Period {
  pub granularity: Granularity,
  pub date:        Option<String>,
}

impl Period {
  fn query(&self) -> Vec<(&'static str, String)> {
    let mut q = vec![("granularity", self.granularity.to_string())];
    if let Some(date) = &self.date {
      q.push(("date", date.clone()));
    }
    q
  }

  fn body(&self) -> Value {
    json!({ "granularity": self.granularity, "date": self.date })
  }
}

/// Async HTTP client for the intake JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  /// Send `req`, turning a non-2xx answer into an error that carries the
  /// server's `{"error": ..}` message when there is one.
  async fn send(&self, req: RequestBuilder, what: &str) -> Result<Response> {
    let resp = req.send().await.with_context(|| format!("{what} failed"))?;
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let detail = resp
      .json::<Value>()
      .await
      .ok()
      .and_then(|v| v.get("error")?.as_str().map(str::to_owned));
    Err(match detail {
      Some(detail) => anyhow!("{what} → {status}: {detail}"),
      None => anyhow!("{what} → {status}"),
    })
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  /// `GET /api/profiles`
  pub async fn list_profiles(&self) -> Result<Vec<Profile>> {
    self
      .send(self.client.get(self.url("/profiles")), "GET /profiles")
      .await?
      .json()
      .await
      .context("deserialising profiles")
  }

  /// `PATCH /api/profiles/{id}/status`
  pub async fn set_status(&self, id: &str, status: ProfileStatus) -> Result<()> {
    let req = self
      .client
      .patch(self.url(&format!("/profiles/{id}/status")))
      .json(&json!({ "status": status }));
    self.send(req, "PATCH /profiles/{id}/status").await?;
    Ok(())
  }

  /// `DELETE /api/profiles/{id}`
  pub async fn delete_profile(&self, id: &str) -> Result<()> {
    let req = self.client.delete(self.url(&format!("/profiles/{id}")));
    self.send(req, "DELETE /profiles/{id}").await?;
    Ok(())
  }

  /// `DELETE /api/profiles/{id}/photos/{photo_id}`
  pub async fn delete_photo(&self, profile_id: &str, photo_id: &str) -> Result<()> {
    let req = self
      .client
      .delete(self.url(&format!("/profiles/{profile_id}/photos/{photo_id}")));
    self.send(req, "DELETE /profiles/{id}/photos/{photo_id}").await?;
    Ok(())
  }

  /// `DELETE /api/profiles`
  pub async fn clear(&self) -> Result<()> {
    self
      .send(self.client.delete(self.url("/profiles")), "DELETE /profiles")
      .await?;
    Ok(())
  }

  // ── Dashboard ─────────────────────────────────────────────────────────────

  /// `GET /api/dashboard?granularity=..&date=..`
  pub async fn dashboard(&self, period: &Period) -> Result<Dashboard> {
    let req = self.client.get(self.url("/dashboard")).query(&period.query());
    self
      .send(req, "GET /dashboard")
      .await?
      .json()
      .await
      .context("deserialising dashboard")
  }

  /// `POST /api/reports`
  pub async fn report(&self, period: &Period) -> Result<ReportOutcome> {
    let req = self.client.post(self.url("/reports")).json(&period.body());
    self
      .send(req, "POST /reports")
      .await?
      .json()
      .await
      .context("deserialising report outcome")
  }

  /// `GET /api/export`, returning the raw JSON backup.
  pub async fn export(&self, period: &Period) -> Result<Vec<u8>> {
    let req = self.client.get(self.url("/export")).query(&period.query());
    let bytes = self
      .send(req, "GET /export")
      .await?
      .bytes()
      .await
      .context("reading export body")?;
    Ok(bytes.to_vec())
  }
}
