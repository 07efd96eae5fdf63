//! Per-collaborator statistics over a set of profiles.
//!
//! Grouping uses the raw `collaborator_name`: matching is exact and
//! case-sensitive, so `"Lan"` and `" Lan"` count as different collaborators.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::profile::Profile;

/// Submission totals for one collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaboratorStats {
  pub name:      String,
  pub count:     usize,
  /// Latest profile `timestamp` in the group (ms since epoch).
  pub last_time: i64,
}

/// Bar-chart series derived from a statistics table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
  pub labels: Vec<String>,
  pub data:   Vec<usize>,
}

/// Group `profiles` by collaborator, ordered by `count` descending.
///
/// Collaborators with equal counts keep the order in which they were first
/// seen in `profiles`.
pub fn collaborator_stats<'a, I>(profiles: I) -> Vec<CollaboratorStats>
where
  I: IntoIterator<Item = &'a Profile>,
{
  let mut stats: Vec<CollaboratorStats> = Vec::new();
  let mut index: HashMap<&'a str, usize> = HashMap::new();

  for profile in profiles {
    let name = profile.collaborator_name.as_str();
    match index.get(name).copied() {
      Some(i) => {
        let entry = &mut stats[i];
        entry.count += 1;
        entry.last_time = entry.last_time.max(profile.timestamp);
      }
      None => {
        index.insert(name, stats.len());
        stats.push(CollaboratorStats {
          name:      name.to_owned(),
          count:     1,
          last_time: profile.timestamp,
        });
      }
    }
  }

  // `sort_by` is stable, which gives the first-seen tie-break.
  stats.sort_by(|a, b| b.count.cmp(&a.count));
  stats
}

impl ChartSeries {
  pub fn from_stats(stats: &[CollaboratorStats]) -> Self {
    Self {
      labels: stats.iter().map(|s| s.name.clone()).collect(),
      data:   stats.iter().map(|s| s.count).collect(),
    }
  }
}
