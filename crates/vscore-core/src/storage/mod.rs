//! Snapshot Persistence
//!
//! Pluggable persistence port for the metrics snapshot. The engine only ever
//! sees the [`SnapshotStore`] trait: load the snapshot for a subject (absence
//! triggers fresh initialization), save the full aggregate after a committed
//! mutation, delete on explicit reset.
//!
//! A snapshot that exists but does not parse is treated as absent — the
//! engine reinitializes from persona defaults and the recovery is logged,
//! never thrown.

mod json;
mod sqlite;

pub use json::JsonFileStore;
pub use sqlite::SqliteStore;

use std::collections::HashMap;
use std::sync::Mutex;

use crate::metrics::Metrics;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Persistence error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Snapshot serialization error
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
}

/// Persistence result type
pub type Result<T> = std::result::Result<T, StoreError>;

// ============================================================================
// STORE TRAIT
// ============================================================================

/// Persistence port for metrics snapshots, keyed by subject id.
pub trait SnapshotStore: Send + Sync {
    /// Load the snapshot for a subject. `Ok(None)` means absent (including
    /// the corrupt-snapshot recovery path).
    fn load(&self, subject: &str) -> Result<Option<Metrics>>;

    /// Persist the full snapshot for a subject.
    fn save(&self, subject: &str, metrics: &Metrics) -> Result<()>;

    /// Remove a subject's persisted snapshot.
    fn delete(&self, subject: &str) -> Result<()>;
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// In-memory store, primarily for tests and ephemeral contexts.
#[derive(Default)]
pub struct MemoryStore {
    snapshots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, subject: &str) -> Result<Option<Metrics>> {
        let snapshots = self
            .snapshots
            .lock()
            .map_err(|_| StoreError::Init("snapshot lock poisoned".into()))?;
        match snapshots.get(subject) {
            Some(raw) => match serde_json::from_str(raw) {
                Ok(metrics) => Ok(Some(metrics)),
                Err(err) => {
                    tracing::warn!(subject, %err, "corrupt snapshot, reinitializing");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    fn save(&self, subject: &str, metrics: &Metrics) -> Result<()> {
        let raw = serde_json::to_string(metrics)?;
        self.snapshots
            .lock()
            .map_err(|_| StoreError::Init("snapshot lock poisoned".into()))?
            .insert(subject.to_string(), raw);
        Ok(())
    }

    fn delete(&self, subject: &str) -> Result<()> {
        self.snapshots
            .lock()
            .map_err(|_| StoreError::Init("snapshot lock poisoned".into()))?
            .remove(subject);
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalogs;
    use crate::vesting::Persona;
    use chrono::Utc;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        let catalogs = Catalogs::default();
        let metrics = Metrics::new(Persona::Analyst, &catalogs, Utc::now());

        assert!(store.load("subject-1").unwrap().is_none());
        store.save("subject-1", &metrics).unwrap();

        let loaded = store.load("subject-1").unwrap().unwrap();
        assert_eq!(loaded.persona, Persona::Analyst);
        assert_eq!(loaded.current_score, metrics.current_score);

        store.delete("subject-1").unwrap();
        assert!(store.load("subject-1").unwrap().is_none());
    }

    #[test]
    fn test_poisoned_lock_surfaces_as_init_error() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.snapshots.lock().unwrap();
            panic!("poison the store lock");
        })
        .join();

        assert!(matches!(store.load("subject-1"), Err(StoreError::Init(_))));

        let catalogs = Catalogs::default();
        let metrics = Metrics::new(Persona::Founder, &catalogs, Utc::now());
        assert!(matches!(
            store.save("subject-1", &metrics),
            Err(StoreError::Init(_))
        ));
        assert!(matches!(store.delete("subject-1"), Err(StoreError::Init(_))));
    }

    #[test]
    fn test_corrupt_snapshot_loads_as_absent() {
        let store = MemoryStore::new();
        store
            .snapshots
            .lock()
            .unwrap()
            .insert("subject-1".to_string(), "{not json".to_string());
        assert!(store.load("subject-1").unwrap().is_none());
    }
}
