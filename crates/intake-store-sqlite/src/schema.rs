//! SQL schema for the intake SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Photos reference their profile but carry no `ON DELETE CASCADE`: the store
/// removes them explicitly inside the same transaction as the profile.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS profiles (
    id                TEXT PRIMARY KEY,
    collaborator_name TEXT NOT NULL,
    student_name      TEXT NOT NULL,
    student_phone     TEXT NOT NULL,
    notes             TEXT,
    timestamp         INTEGER NOT NULL,   -- ms since epoch; never updated
    status            TEXT NOT NULL DEFAULT 'pending'
);

CREATE TABLE IF NOT EXISTS photos (
    id          TEXT PRIMARY KEY,
    profile_id  TEXT NOT NULL REFERENCES profiles(id),
    data        TEXT NOT NULL,
    created_at  INTEGER NOT NULL       -- ms since epoch
);

CREATE INDEX IF NOT EXISTS profiles_timestamp_idx ON profiles(timestamp DESC);
CREATE INDEX IF NOT EXISTS profiles_status_idx    ON profiles(status);
CREATE INDEX IF NOT EXISTS photos_profile_idx     ON photos(profile_id);

PRAGMA user_version = 1;
";
