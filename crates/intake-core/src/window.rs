//! Time windows for the admin dashboard.
//!
//! A [`WindowSelector`] is what the admin picks: a granularity and an anchor
//! date. Resolving it against a time zone yields a [`TimeWindow`], an
//! inclusive millisecond range covering the whole day, month or year that
//! contains the anchor. Anchors that cannot be parsed resolve to
//! [`TimeWindow::Empty`], which matches nothing.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Granularity ─────────────────────────────────────────────────────────────

/// How wide a window is.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
  #[default]
  Day,
  Month,
  Year,
}

impl Granularity {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Day => "day",
      Self::Month => "month",
      Self::Year => "year",
    }
  }
}

impl FromStr for Granularity {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "day" => Ok(Self::Day),
      "month" => Ok(Self::Month),
      "year" => Ok(Self::Year),
      other => Err(Error::UnknownGranularity(other.to_owned())),
    }
  }
}

impl fmt::Display for Granularity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── TimeWindow ──────────────────────────────────────────────────────────────

/// A resolved range of creation instants, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeWindow {
  /// Milliseconds since the Unix epoch; `start <= end`.
  Range { start: i64, end: i64 },
  /// Produced for unparseable anchors. Contains no instant.
  Empty,
}

impl TimeWindow {
  /// Whether `timestamp` (ms since epoch) falls inside the window.
  pub fn contains(&self, timestamp: i64) -> bool {
    match *self {
      Self::Range { start, end } => start <= timestamp && timestamp <= end,
      Self::Empty => false,
    }
  }

  /// Window spanning from the first millisecond of `first` to the last
  /// millisecond of `last`, both calendar dates in `tz`.
  fn spanning<Tz: TimeZone>(first: NaiveDate, last: NaiveDate, tz: &Tz) -> Self {
    let start = tz
      .from_local_datetime(&first.and_time(NaiveTime::MIN))
      .earliest();
    let end = last
      .and_hms_milli_opt(23, 59, 59, 999)
      .and_then(|naive| tz.from_local_datetime(&naive).latest());

    match (start, end) {
      (Some(start), Some(end)) => Self::Range {
        start: start.timestamp_millis(),
        end:   end.timestamp_millis(),
      },
      _ => Self::Empty,
    }
  }
}

// ─── WindowSelector ──────────────────────────────────────────────────────────

/// The admin's choice of period: a granularity plus an anchor date string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSelector {
  pub granularity: Granularity,
  /// `YYYY-MM-DD`, `YYYY-MM`, or an RFC 3339 instant.
  pub anchor_date: String,
}

impl WindowSelector {
  pub fn new(granularity: Granularity, anchor_date: impl Into<String>) -> Self {
    Self { granularity, anchor_date: anchor_date.into() }
  }

  /// The default selection for `granularity` as of `today`: the day itself,
  /// the first of its month, or the first of its year.
  pub fn current(granularity: Granularity, today: NaiveDate) -> Self {
    let anchor = match granularity {
      Granularity::Day => Some(today),
      Granularity::Month => NaiveDate::from_ymd_opt(today.year(), today.month(), 1),
      Granularity::Year => NaiveDate::from_ymd_opt(today.year(), 1, 1),
    }
    .unwrap_or(today);
    Self::new(granularity, anchor.format("%Y-%m-%d").to_string())
  }

  /// The calendar date the anchor names in `tz`, or `None` if it cannot be
  /// parsed.
  pub fn anchor<Tz: TimeZone>(&self, tz: &Tz) -> Option<NaiveDate> {
    let raw = self.anchor_date.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
      return Some(date);
    }
    // Month pickers submit `YYYY-MM`.
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d") {
      return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
      .ok()
      .map(|dt| dt.with_timezone(tz).date_naive())
  }

  /// First and last calendar day of the period containing `anchor`.
  fn calendar_span(&self, anchor: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    match self.granularity {
      Granularity::Day => Some((anchor, anchor)),
      Granularity::Month => {
        let first = NaiveDate::from_ymd_opt(anchor.year(), anchor.month(), 1)?;
        // Day zero of the following month.
        let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
        Some((first, last))
      }
      Granularity::Year => Some((
        NaiveDate::from_ymd_opt(anchor.year(), 1, 1)?,
        NaiveDate::from_ymd_opt(anchor.year(), 12, 31)?,
      )),
    }
  }

  /// Resolve to a concrete window using `tz` as local time.
  pub fn resolve<Tz: TimeZone>(&self, tz: &Tz) -> TimeWindow {
    self
      .anchor(tz)
      .and_then(|anchor| self.calendar_span(anchor))
      .map(|(first, last)| TimeWindow::spanning(first, last, tz))
      .unwrap_or(TimeWindow::Empty)
  }

  /// Human label for the period, e.g. `day 5/1/2025`, `month 1/2025`,
  /// `year 2025`. `None` when the anchor is unparseable.
  pub fn period_label<Tz: TimeZone>(&self, tz: &Tz) -> Option<String> {
    let anchor = self.anchor(tz)?;
    Some(match self.granularity {
      Granularity::Day => format!("day {}", anchor.format("%-d/%-m/%Y")),
      Granularity::Month => format!("month {}", anchor.format("%-m/%Y")),
      Granularity::Year => format!("year {}", anchor.format("%Y")),
    })
  }

  /// Message shown in place of the record list when nothing matched.
  pub fn empty_message<Tz: TimeZone>(&self, tz: &Tz) -> String {
    match self.period_label(tz) {
      Some(label) => format!("No records for {label}"),
      None => "No records for the selected period".to_owned(),
    }
  }
}
