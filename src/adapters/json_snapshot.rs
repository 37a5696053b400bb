//! JSON file snapshot adapter.
//!
//! The snapshot is written to a sibling temp file and renamed into
//! place, so readers never observe a partial write.

use crate::domain::error::TiercastError;
use crate::domain::snapshot::Snapshot;
use crate::ports::snapshot_port::SnapshotPort;
use std::fs;
use std::path::{Path, PathBuf};

pub struct JsonSnapshotAdapter {
    path: PathBuf,
}

impl JsonSnapshotAdapter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SnapshotPort for JsonSnapshotAdapter {
    fn load(&self) -> Result<Option<Snapshot>, TiercastError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let snapshot =
            serde_json::from_str(&content).map_err(|e| TiercastError::Snapshot {
                reason: format!("{}: {e}", self.path.display()),
            })?;
        Ok(Some(snapshot))
    }

    fn store(&self, snapshot: &Snapshot) -> Result<(), TiercastError> {
        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
