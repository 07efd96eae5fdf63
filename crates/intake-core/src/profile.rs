//! Profile types: the records collaborators submit and administrators
//! review.
//!
//! A profile owns its photos outright: photos never outlive the profile they
//! were attached to, and are always read back in upload order.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Review state of a profile. Any state may move to any other.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ProfileStatus {
  #[default]
  Pending,
  Approved,
  Rejected,
}

impl ProfileStatus {
  /// The string stored in the `status` column and used on the wire.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Pending => "pending",
      Self::Approved => "approved",
      Self::Rejected => "rejected",
    }
  }
}

impl FromStr for ProfileStatus {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "pending" => Ok(Self::Pending),
      "approved" => Ok(Self::Approved),
      "rejected" => Ok(Self::Rejected),
      other => Err(Error::UnknownStatus(other.to_owned())),
    }
  }
}

impl fmt::Display for ProfileStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Photo ───────────────────────────────────────────────────────────────────

/// An image attached to a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
  pub id:         String,
  /// Encoded image payload, stored verbatim (usually a base64 data URL).
  pub data:       String,
  /// Milliseconds since the Unix epoch.
  pub created_at: i64,
}

// ─── Profile ─────────────────────────────────────────────────────────────────

/// A student record submitted by a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
  /// Caller-supplied identity; must be unique across the store.
  pub id:                String,
  pub collaborator_name: String,
  pub student_name:      String,
  pub student_phone:     String,
  #[serde(default)]
  pub notes:             String,
  /// Creation instant in milliseconds since the Unix epoch. Never updated.
  pub timestamp:         i64,
  #[serde(default)]
  pub status:            ProfileStatus,
  /// Photos in upload order.
  #[serde(default)]
  pub photos:            Vec<Photo>,
}

impl Profile {
  /// Names of the required fields that are missing or blank, plus `photos`
  /// when no photo is attached. Empty for a well-formed submission.
  pub fn missing_fields(&self) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if self.id.trim().is_empty() {
      missing.push("id");
    }
    if self.collaborator_name.trim().is_empty() {
      missing.push("collaboratorName");
    }
    if self.student_name.trim().is_empty() {
      missing.push("studentName");
    }
    if self.student_phone.trim().is_empty() {
      missing.push("studentPhone");
    }
    if self.photos.is_empty() {
      missing.push("photos");
    }
    missing
  }
}
