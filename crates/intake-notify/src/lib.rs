//! Admin notifications over an HTTP messaging channel.
//!
//! [`MessagingNotifier`] implements
//! [`NotificationDispatcher`](intake_core::report::NotificationDispatcher).
//! When the channel is not fully configured it formats each message and
//! writes it to the log instead, so a bare development setup never fails a
//! submission or a report.

pub mod error;
pub mod message;

use std::time::Duration;

use chrono::FixedOffset;
use intake_core::{
  profile::Profile,
  report::{NotificationDispatcher, ReportSummary},
};
use serde::Deserialize;
use serde_json::json;

pub use error::{Error, Result};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Messaging channel settings. All three of `endpoint`, `access_token` and
/// `recipient_id` must be present for messages to leave the process.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagingConfig {
  /// URL that accepts `{"recipient":{"user_id":..},"message":{"text":..}}`.
  pub endpoint:     Option<String>,
  pub access_token: Option<String>,
  /// The admin account that receives messages.
  pub recipient_id: Option<String>,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 { 10 }

/// A fully-specified channel, split out of [`MessagingConfig`].
#[derive(Debug, Clone)]
struct Channel {
  endpoint:     String,
  access_token: String,
  recipient_id: String,
}

impl MessagingConfig {
  fn channel(&self) -> Option<Channel> {
    let present = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());
    Some(Channel {
      endpoint:     present(&self.endpoint)?,
      access_token: present(&self.access_token)?,
      recipient_id: present(&self.recipient_id)?,
    })
  }
}

// ─── Notifier ─────────────────────────────────────────────────────────────────

/// Sends admin messages, or logs them when unconfigured.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct MessagingNotifier {
  client:  reqwest::Client,
  channel: Option<Channel>,
  /// Zone used for timestamps in message bodies.
  tz:      FixedOffset,
}

impl MessagingNotifier {
  pub fn new(config: &MessagingConfig, tz: FixedOffset) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;
    let channel = config.channel();
    if channel.is_none() {
      tracing::warn!("messaging channel not configured; notifications will be logged only");
    }
    Ok(Self { client, channel, tz })
  }

  pub fn is_configured(&self) -> bool { self.channel.is_some() }

  async fn deliver(&self, kind: &str, text: String) -> Result<()> {
    let Some(channel) = &self.channel else {
      tracing::info!(kind, "notification (not sent):\n{text}");
      return Ok(());
    };

    let body = json!({
      "recipient": { "user_id": channel.recipient_id },
      "message":   { "text": text },
    });

    let resp = self
      .client
      .post(&channel.endpoint)
      .header("access_token", &channel.access_token)
      .json(&body)
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(Error::Status(resp.status()));
    }
    tracing::debug!(kind, "notification delivered");
    Ok(())
  }
}

impl NotificationDispatcher for MessagingNotifier {
  type Error = Error;

  async fn profile_created(&self, profile: &Profile) -> Result<()> {
    tracing::info!(profile_id = %profile.id, "sending new-profile notification");
    self
      .deliver("profile_created", message::profile_created_text(profile, &self.tz))
      .await
  }

  async fn send_report(&self, summary: &ReportSummary) -> Result<()> {
    tracing::info!(period = %summary.period_label, "sending report");
    self.deliver("report", message::report_text(summary)).await
  }
}
