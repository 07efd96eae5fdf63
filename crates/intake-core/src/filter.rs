//! Selecting the profiles created inside a [`TimeWindow`].

use crate::{profile::Profile, window::TimeWindow};

/// Profiles whose `timestamp` lies inside `window`, in input order.
///
/// Accepts any iterator of borrowed profiles, so an already-filtered result
/// can be filtered again with `result.iter().copied()`.
pub fn filter_profiles<'a, I>(profiles: I, window: &TimeWindow) -> Vec<&'a Profile>
where
  I: IntoIterator<Item = &'a Profile>,
{
  profiles
    .into_iter()
    .filter(|profile| window.contains(profile.timestamp))
    .collect()
}
