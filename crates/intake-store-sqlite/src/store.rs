//! [`SqliteStore`], the SQLite implementation of [`ProfileStore`].

use std::path::Path;

use intake_core::{
  profile::{Profile, ProfileStatus},
  store::ProfileStore,
};
use rusqlite::OptionalExtension as _;

use crate::{
  encode::{
    PHOTO_COLUMNS, PROFILE_COLUMNS, RawPhoto, RawProfile, encode_status,
    group_photos,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A profile store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ProfileStore impl ───────────────────────────────────────────────────────

/// Result of the create transaction. Any variant other than `Stored` means
/// the transaction was dropped without committing.
enum Insert {
  Stored,
  DuplicateProfile,
  DuplicatePhoto(String),
}

impl ProfileStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn create_profile(&self, profile: Profile) -> Result<Profile> {
    let row = profile.clone();

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let exists = tx
          .query_row(
            "SELECT 1 FROM profiles WHERE id = ?1",
            rusqlite::params![row.id],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if exists {
          return Ok(Insert::DuplicateProfile);
        }

        tx.execute(
          "INSERT INTO profiles (
             id, collaborator_name, student_name, student_phone,
             notes, timestamp, status
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            row.id,
            row.collaborator_name,
            row.student_name,
            row.student_phone,
            row.notes,
            row.timestamp,
            encode_status(row.status),
          ],
        )?;

        {
          let mut stmt = tx.prepare(
            "INSERT INTO photos (id, profile_id, data, created_at)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          let mut taken = tx.prepare("SELECT 1 FROM photos WHERE id = ?1")?;
          for photo in &row.photos {
            // Earlier photos of this submission are already inserted, so a
            // repeated id inside the request is caught here too.
            if taken.exists(rusqlite::params![photo.id])? {
              return Ok(Insert::DuplicatePhoto(photo.id.clone()));
            }
            stmt.execute(rusqlite::params![
              photo.id,
              row.id,
              photo.data,
              photo.created_at,
            ])?;
          }
        }

        // Dropping `tx` on any early `?` above rolls the whole profile back.
        tx.commit()?;
        Ok(Insert::Stored)
      })
      .await?;

    match inserted {
      Insert::Stored => {}
      Insert::DuplicateProfile => return Err(Error::DuplicateProfile(profile.id)),
      Insert::DuplicatePhoto(id) => return Err(Error::DuplicatePhoto(id)),
    }

    tracing::debug!(
      profile_id = %profile.id,
      photos = profile.photos.len(),
      "profile stored"
    );
    Ok(profile)
  }

  async fn update_status(&self, id: &str, status: ProfileStatus) -> Result<bool> {
    let id_str     = id.to_owned();
    let status_str = encode_status(status);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE profiles SET status = ?1 WHERE id = ?2",
          rusqlite::params![status_str, id_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn delete_profile(&self, id: &str) -> Result<bool> {
    let id_str = id.to_owned();

    let changed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM photos WHERE profile_id = ?1",
          rusqlite::params![id_str],
        )?;
        let changed = tx.execute(
          "DELETE FROM profiles WHERE id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.commit()?;
        Ok(changed)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn delete_photo(&self, profile_id: &str, photo_id: &str) -> Result<bool> {
    let profile_id_str = profile_id.to_owned();
    let photo_id_str   = photo_id.to_owned();

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM photos WHERE id = ?1 AND profile_id = ?2",
          rusqlite::params![photo_id_str, profile_id_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn clear_all(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;
        tx.execute_batch("DELETE FROM photos; DELETE FROM profiles;")?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::info!("all profiles cleared");
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_profiles(&self) -> Result<Vec<Profile>> {
    let (raws, photos): (Vec<RawProfile>, Vec<RawPhoto>) = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY timestamp DESC"
        ))?;
        let profiles = stmt
          .query_map([], RawProfile::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(&format!(
          "SELECT {PHOTO_COLUMNS} FROM photos ORDER BY created_at, rowid"
        ))?;
        let photos = stmt
          .query_map([], RawPhoto::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((profiles, photos))
      })
      .await?;

    let mut by_profile = group_photos(photos);
    raws
      .into_iter()
      .map(|raw| {
        let photos = by_profile.remove(&raw.id).unwrap_or_default();
        raw.into_profile(photos)
      })
      .collect()
  }

  async fn get_profile(&self, id: &str) -> Result<Option<Profile>> {
    let id_str = id.to_owned();

    let found: Option<(RawProfile, Vec<RawPhoto>)> = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ?1"),
            rusqlite::params![id_str],
            RawProfile::from_row,
          )
          .optional()?;

        let Some(raw) = raw else {
          return Ok(None);
        };

        let mut stmt = conn.prepare(&format!(
          "SELECT {PHOTO_COLUMNS} FROM photos
           WHERE profile_id = ?1
           ORDER BY created_at, rowid"
        ))?;
        let photos = stmt
          .query_map(rusqlite::params![id_str], RawPhoto::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some((raw, photos)))
      })
      .await?;

    found
      .map(|(raw, photos)| {
        let photos = group_photos(photos).remove(&raw.id).unwrap_or_default();
        raw.into_profile(photos)
      })
      .transpose()
  }

  async fn count_profiles(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM profiles", [], |r| r.get(0))?)
      })
      .await?;
    Ok(count as u64)
  }
}
