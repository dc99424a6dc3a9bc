//! JSON file snapshot store.
//!
//! One pretty-printed JSON document per subject under a base directory.
//! Defaults to the platform data directory; dates travel as ISO-8601 strings
//! via the serde representation of the snapshot.

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use tracing::warn;

use crate::metrics::Metrics;

use super::{Result, SnapshotStore, StoreError};

/// File-per-subject JSON snapshot store.
pub struct JsonFileStore {
    base_dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `base_dir`, or at the platform data
    /// directory when `None`.
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let base_dir = match base_dir {
            Some(dir) => dir,
            None => ProjectDirs::from("dev", "vscore", "vscore")
                .ok_or_else(|| StoreError::Init("cannot resolve data directory".to_string()))?
                .data_dir()
                .join("snapshots"),
        };
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn path_for(&self, subject: &str) -> PathBuf {
        // Subject ids are caller-controlled; keep them filesystem-safe.
        let safe: String = subject
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_dir.join(format!("{safe}.json"))
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self, subject: &str) -> Result<Option<Metrics>> {
        let path = self.path_for(subject);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)?;
        match serde_json::from_str(&raw) {
            Ok(metrics) => Ok(Some(metrics)),
            Err(err) => {
                warn!(subject, path = %path.display(), %err, "corrupt snapshot, reinitializing");
                Ok(None)
            }
        }
    }

    fn save(&self, subject: &str, metrics: &Metrics) -> Result<()> {
        let raw = serde_json::to_string_pretty(metrics)?;
        // Write-then-rename keeps a crash from truncating the only copy.
        let path = self.path_for(subject);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn delete(&self, subject: &str) -> Result<()> {
        let path = self.path_for(subject);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
