//! Plain-text rendering for terminal output.

use std::fmt::Write as _;

use chrono::{DateTime, TimeZone};
use intake_core::{
  dashboard::Dashboard,
  profile::Profile,
  stats::{ChartSeries, CollaboratorStats},
};

/// Widest bar drawn by [`bar_chart`].
const BAR_WIDTH: usize = 40;

fn local_time<Tz: TimeZone>(millis: i64, tz: &Tz) -> String
where
  Tz::Offset: std::fmt::Display,
{
  match DateTime::from_timestamp_millis(millis) {
    Some(t) => t.with_timezone(tz).format("%d/%m/%Y %H:%M").to_string(),
    None => "-".to_owned(),
  }
}

fn width<'a>(header: &str, cells: impl Iterator<Item = &'a str>) -> usize {
  cells.map(|c| c.chars().count()).max().unwrap_or(0).max(header.len())
}

/// One line per profile: id, status, collaborator, student, phone, photo
/// count and submission time.
pub fn profile_table<Tz: TimeZone>(profiles: &[Profile], tz: &Tz) -> String
where
  Tz::Offset: std::fmt::Display,
{
  let id_w = width("ID", profiles.iter().map(|p| p.id.as_str()));
  let who_w = width("COLLABORATOR", profiles.iter().map(|p| p.collaborator_name.as_str()));
  let name_w = width("STUDENT", profiles.iter().map(|p| p.student_name.as_str()));

  let mut out = String::new();
  let _ = writeln!(
    out,
    "{:<id_w$}  {:<8}  {:<who_w$}  {:<name_w$}  {:<12}  {:>6}  SUBMITTED",
    "ID", "STATUS", "COLLABORATOR", "STUDENT", "PHONE", "PHOTOS"
  );
  for p in profiles {
    let _ = writeln!(
      out,
      "{:<id_w$}  {:<8}  {:<who_w$}  {:<name_w$}  {:<12}  {:>6}  {}",
      p.id,
      p.status,
      p.collaborator_name,
      p.student_name,
      p.student_phone,
      p.photos.len(),
      local_time(p.timestamp, tz),
    );
  }
  out
}

/// Collaborator ranking, busiest first.
pub fn ranking_table<Tz: TimeZone>(stats: &[CollaboratorStats], tz: &Tz) -> String
where
  Tz::Offset: std::fmt::Display,
{
  let name_w = width("COLLABORATOR", stats.iter().map(|s| s.name.as_str()));

  let mut out = String::new();
  let _ = writeln!(out, "{:>3}  {:<name_w$}  {:>5}  LATEST", "#", "COLLABORATOR", "COUNT");
  for (rank, s) in stats.iter().enumerate() {
    let _ = writeln!(
      out,
      "{:>3}  {:<name_w$}  {:>5}  {}",
      rank + 1,
      s.name,
      s.count,
      local_time(s.last_time, tz),
    );
  }
  out
}

/// Horizontal bars scaled so the largest value spans [`BAR_WIDTH`] cells.
pub fn bar_chart(chart: &ChartSeries) -> String {
  let label_w = width("", chart.labels.iter().map(String::as_str));
  let max = chart.data.iter().copied().max().unwrap_or(0);

  let mut out = String::new();
  for (label, &value) in chart.labels.iter().zip(&chart.data) {
    let len = if max == 0 { 0 } else { (value * BAR_WIDTH).div_ceil(max) };
    let _ = writeln!(out, "{label:<label_w$}  {} {value}", "█".repeat(len));
  }
  out
}

/// The full dashboard: ranking and chart, or the empty-state message.
pub fn dashboard<Tz: TimeZone>(view: &Dashboard, tz: &Tz) -> String
where
  Tz::Offset: std::fmt::Display,
{
  if let Some(message) = &view.empty_message {
    return format!("{message}\n");
  }
  format!(
    "{} profiles\n\n{}\n{}",
    view.profiles.len(),
    ranking_table(&view.stats, tz),
    bar_chart(&view.chart),
  )
}
