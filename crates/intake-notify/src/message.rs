//! Plain-text message bodies sent to the admin channel.

use chrono::{DateTime, TimeZone};
use intake_core::{profile::Profile, report::ReportSummary};

/// Body announcing a newly submitted profile. Times are rendered in `tz`.
pub fn profile_created_text<Tz>(profile: &Profile, tz: &Tz) -> String
where
  Tz: TimeZone,
  Tz::Offset: std::fmt::Display,
{
  let notes = if profile.notes.trim().is_empty() {
    "none"
  } else {
    profile.notes.as_str()
  };
  let submitted = DateTime::from_timestamp_millis(profile.timestamp)
    .map(|dt| dt.with_timezone(tz).format("%d/%m/%Y %H:%M:%S").to_string())
    .unwrap_or_else(|| profile.timestamp.to_string());

  format!(
    "NEW PROFILE\n\
     Collaborator: {}\n\
     Student: {}\n\
     Phone: {}\n\
     Photos: {}\n\
     Notes: {}\n\
     Submitted: {}",
    profile.collaborator_name,
    profile.student_name,
    profile.student_phone,
    profile.photos.len(),
    notes,
    submitted,
  )
}

/// Body of a period summary.
pub fn report_text(summary: &ReportSummary) -> String {
  format!(
    "REPORT {}\nReceived: {} profiles\nActive collaborators: {}",
    summary.period_label, summary.profile_count, summary.collaborator_count,
  )
}
