//! Decoding helpers between SQLite rows and the domain types.
//!
//! Timestamps are stored as integer milliseconds since the epoch, statuses as
//! their lowercase wire names. Notes may be `NULL` in older rows and decode to
//! an empty string.

use std::collections::HashMap;

use intake_core::profile::{Photo, Profile, ProfileStatus};

use crate::Result;

// ─── ProfileStatus ───────────────────────────────────────────────────────────

pub fn encode_status(status: ProfileStatus) -> &'static str { status.as_str() }

pub fn decode_status(s: &str) -> Result<ProfileStatus> { Ok(s.parse()?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawProfile::from_row`].
pub const PROFILE_COLUMNS: &str =
  "id, collaborator_name, student_name, student_phone, notes, timestamp, status";

/// Raw values read directly from a `profiles` row.
pub struct RawProfile {
  pub id:                String,
  pub collaborator_name: String,
  pub student_name:      String,
  pub student_phone:     String,
  pub notes:             Option<String>,
  pub timestamp:         i64,
  pub status:            String,
}

impl RawProfile {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                row.get(0)?,
      collaborator_name: row.get(1)?,
      student_name:      row.get(2)?,
      student_phone:     row.get(3)?,
      notes:             row.get(4)?,
      timestamp:         row.get(5)?,
      status:            row.get(6)?,
    })
  }

  pub fn into_profile(self, photos: Vec<Photo>) -> Result<Profile> {
    Ok(Profile {
      id: self.id,
      collaborator_name: self.collaborator_name,
      student_name: self.student_name,
      student_phone: self.student_phone,
      notes: self.notes.unwrap_or_default(),
      timestamp: self.timestamp,
      status: decode_status(&self.status)?,
      photos,
    })
  }
}

/// Column list matching [`RawPhoto::from_row`].
pub const PHOTO_COLUMNS: &str = "profile_id, id, data, created_at";

/// Raw values read directly from a `photos` row.
pub struct RawPhoto {
  pub profile_id: String,
  pub id:         String,
  pub data:       String,
  pub created_at: i64,
}

impl RawPhoto {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      profile_id: row.get(0)?,
      id:         row.get(1)?,
      data:       row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  fn into_photo(self) -> Photo {
    Photo { id: self.id, data: self.data, created_at: self.created_at }
  }
}

/// Bucket photo rows by owning profile, keeping row order within a bucket.
pub fn group_photos(raws: Vec<RawPhoto>) -> HashMap<String, Vec<Photo>> {
  let mut grouped: HashMap<String, Vec<Photo>> = HashMap::new();
  for raw in raws {
    grouped
      .entry(raw.profile_id.clone())
      .or_default()
      .push(raw.into_photo());
  }
  grouped
}
