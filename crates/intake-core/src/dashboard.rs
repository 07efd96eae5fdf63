//! The admin dashboard read model. Never stored, always derived from a
//! snapshot of the store.

use chrono::TimeZone;
use serde::{Deserialize, Serialize};

use crate::{
  filter::filter_profiles,
  profile::Profile,
  stats::{ChartSeries, CollaboratorStats, collaborator_stats},
  window::{TimeWindow, WindowSelector},
};

/// Everything the admin view renders for one period selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
  pub selector:      WindowSelector,
  pub window:        TimeWindow,
  /// Profiles created inside `window`, in snapshot order.
  pub profiles:      Vec<Profile>,
  /// Ranking table, busiest collaborator first.
  pub stats:         Vec<CollaboratorStats>,
  pub chart:         ChartSeries,
  /// Present only when `profiles` is empty.
  pub empty_message: Option<String>,
}

impl Dashboard {
  /// Filter `snapshot` by `selector` (resolved in `tz`) and aggregate.
  pub fn build<Tz: TimeZone>(
    snapshot: &[Profile],
    selector: WindowSelector,
    tz: &Tz,
  ) -> Self {
    let window = selector.resolve(tz);
    let matched = filter_profiles(snapshot, &window);
    let stats = collaborator_stats(matched.iter().copied());
    let chart = ChartSeries::from_stats(&stats);
    let empty_message = matched.is_empty().then(|| selector.empty_message(tz));

    Self {
      profiles: matched.into_iter().cloned().collect(),
      selector,
      window,
      stats,
      chart,
      empty_message,
    }
  }
}
