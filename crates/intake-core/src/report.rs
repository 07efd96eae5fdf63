//! Period reports and the notification seam.
//!
//! The [`NotificationDispatcher`] trait is implemented outside this crate
//! (see `intake-notify`). [`trigger_report`] is the only place the engine
//! talks to it: it refuses to send a report for an empty period and turns a
//! dispatcher failure into a [`ReportOutcome::Failed`] instead of an error.

use std::{collections::HashSet, future::Future};

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::{profile::Profile, window::WindowSelector};

// ─── Dispatcher trait ────────────────────────────────────────────────────────

/// Forwards messages to an external channel.
///
/// Timeouts and retries, if any, belong to the implementation; callers await
/// each call exactly once.
pub trait NotificationDispatcher: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Announce a freshly stored profile.
  fn profile_created<'a>(
    &'a self,
    profile: &'a Profile,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Deliver a period summary.
  fn send_report<'a>(
    &'a self,
    summary: &'a ReportSummary,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

// ─── Summary ─────────────────────────────────────────────────────────────────

/// Payload handed to the dispatcher for a period report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
  /// e.g. `day 5/1/2025`.
  pub period_label:       String,
  pub profile_count:      usize,
  /// Distinct raw collaborator names in the period.
  pub collaborator_count: usize,
  pub generated_at:       DateTime<Utc>,
  pub profile_ids:        Vec<String>,
}

impl ReportSummary {
  pub fn new(
    period_label: impl Into<String>,
    profiles: &[&Profile],
    generated_at: DateTime<Utc>,
  ) -> Self {
    let collaborators: HashSet<&str> = profiles
      .iter()
      .map(|p| p.collaborator_name.as_str())
      .collect();

    Self {
      period_label: period_label.into(),
      profile_count: profiles.len(),
      collaborator_count: collaborators.len(),
      generated_at,
      profile_ids: profiles.iter().map(|p| p.id.clone()).collect(),
    }
  }
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// What the admin is told after asking for a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "message", rename_all = "snake_case")]
pub enum ReportOutcome {
  /// Nothing matched the period; the dispatcher was not called.
  Rejected(String),
  Sent(String),
  Failed(String),
}

impl ReportOutcome {
  pub fn is_sent(&self) -> bool { matches!(self, Self::Sent(_)) }

  pub fn message(&self) -> &str {
    match self {
      Self::Rejected(m) | Self::Sent(m) | Self::Failed(m) => m,
    }
  }
}

// ─── Trigger ─────────────────────────────────────────────────────────────────

/// Send a report for `profiles`, the already-filtered subset for `selector`.
pub async fn trigger_report<D, Tz>(
  dispatcher: &D,
  profiles: &[&Profile],
  selector: &WindowSelector,
  tz: &Tz,
) -> ReportOutcome
where
  D: NotificationDispatcher,
  Tz: TimeZone,
{
  if profiles.is_empty() {
    return ReportOutcome::Rejected("No records in the selected period.".to_owned());
  }

  let label = selector
    .period_label(tz)
    .unwrap_or_else(|| selector.anchor_date.clone());
  let summary = ReportSummary::new(label, profiles, Utc::now());

  match dispatcher.send_report(&summary).await {
    Ok(()) => {
      tracing::info!(
        period = %summary.period_label,
        profiles = summary.profile_count,
        "report sent"
      );
      ReportOutcome::Sent("Report sent".to_owned())
    }
    Err(e) => {
      tracing::warn!(error = %e, period = %summary.period_label, "report dispatch failed");
      ReportOutcome::Failed("Failed to send report".to_owned())
    }
  }
}
