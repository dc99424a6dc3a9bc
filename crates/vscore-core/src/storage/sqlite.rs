//! SQLite snapshot store.
//!
//! One row per subject in a `snapshots` table, the full aggregate stored as
//! a JSON document. WAL journaling so a reader never blocks the single
//! writer; the connection is serialized behind a mutex, matching the
//! engine's one-mutator command model.

use std::path::PathBuf;
use std::sync::Mutex;

use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::warn;

use crate::metrics::Metrics;

use super::{Result, SnapshotStore, StoreError};

/// SQLite-backed snapshot store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the store at `path`, or at the platform data
    /// directory when `None`.
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(p) => p,
            None => {
                let dirs = ProjectDirs::from("dev", "vscore", "vscore")
                    .ok_or_else(|| StoreError::Init("cannot resolve data directory".to_string()))?;
                std::fs::create_dir_all(dirs.data_dir())?;
                dirs.data_dir().join("vscore.db")
            }
        };

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;

             CREATE TABLE IF NOT EXISTS snapshots (
                 subject_id TEXT PRIMARY KEY,
                 snapshot   TEXT NOT NULL,
                 updated_at TEXT NOT NULL
             );",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl SnapshotStore for SqliteStore {
    fn load(&self, subject: &str) -> Result<Option<Metrics>> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::Init("connection lock poisoned".into()))?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT snapshot FROM snapshots WHERE subject_id = ?1",
                params![subject],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(metrics) => Ok(Some(metrics)),
                Err(err) => {
                    warn!(subject, %err, "corrupt snapshot row, reinitializing");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    fn save(&self, subject: &str, metrics: &Metrics) -> Result<()> {
        let raw = serde_json::to_string(metrics)?;
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::Init("connection lock poisoned".into()))?;
        conn.execute(
            "INSERT INTO snapshots (subject_id, snapshot, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(subject_id) DO UPDATE SET
                 snapshot = excluded.snapshot,
                 updated_at = excluded.updated_at",
            params![subject, raw, metrics.last_updated.to_rfc3339()],
        )?;
        Ok(())
    }

    fn delete(&self, subject: &str) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::Init("connection lock poisoned".into()))?;
        conn.execute(
            "DELETE FROM snapshots WHERE subject_id = ?1",
            params![subject],
        )?;
        Ok(())
    }
}
