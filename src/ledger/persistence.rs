//! Snapshot persistence for the in-process ledger

use super::memory::WorldState;
use crate::core::{LedgerError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: u32,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
    pub state: WorldState,
}

impl LedgerSnapshot {
    pub fn new(state: WorldState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            created_at: Utc::now().timestamp_millis(),
            state,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotManager {
    snapshot_path: PathBuf,
}

impl SnapshotManager {
    pub fn new<P: AsRef<Path>>(snapshot_path: P) -> Self {
        Self {
            snapshot_path: snapshot_path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Write to a temp file, sync, then rename over the previous snapshot
    pub fn save(&self, snapshot: &LedgerSnapshot) -> Result<()> {
        if let Some(parent) = self.snapshot_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                LedgerError::Storage(format!("Failed to create snapshot directory: {}", e))
            })?;
        }
        let temp_path = self.snapshot_path.with_extension("tmp");
        let temp_file = File::create(&temp_path)
            .map_err(|e| LedgerError::Storage(format!("Failed to create temp file: {}", e)))?;
        let mut writer = BufWriter::new(temp_file);
        let serialized = rmp_serde::to_vec(snapshot)
            .map_err(|e| LedgerError::Storage(format!("Failed to serialize snapshot: {}", e)))?;
        writer
            .write_all(&serialized)
            .map_err(|e| LedgerError::Storage(format!("Failed to write snapshot: {}", e)))?;
        writer
            .flush()
            .map_err(|e| LedgerError::Storage(format!("Failed to flush snapshot: {}", e)))?;
        writer
            .get_mut()
            .sync_all()
            .map_err(|e| LedgerError::Storage(format!("Failed to sync snapshot: {}", e)))?;
        fs::rename(&temp_path, &self.snapshot_path)
            .map_err(|e| LedgerError::Storage(format!("Failed to rename snapshot: {}", e)))?;

        log::debug!(
            "saved ledger snapshot: path={} height={}",
            self.snapshot_path.display(),
            snapshot.state.height
        );
        Ok(())
    }

    pub fn load(&self) -> Result<Option<LedgerSnapshot>> {
        if !self.snapshot_path.exists() {
            return Ok(None);
        }
        let mut file = File::open(&self.snapshot_path)
            .map_err(|e| LedgerError::Storage(format!("Failed to open snapshot: {}", e)))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .map_err(|e| LedgerError::Storage(format!("Failed to read snapshot: {}", e)))?;
        let snapshot: LedgerSnapshot = rmp_serde::from_slice(&data)
            .map_err(|e| LedgerError::Storage(format!("Failed to deserialize snapshot: {}", e)))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(LedgerError::Storage(format!(
                "Unsupported snapshot version {} (expected {})",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }
        Ok(Some(snapshot))
    }

    pub fn exists(&self) -> bool {
        self.snapshot_path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerConfig;
    use crate::ledger::{InMemoryLedger, LedgerStore};
    use tempfile::TempDir;

    #[test]
    fn test_missing_snapshot_loads_none() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SnapshotManager::new(temp_dir.path().join("ledger.snapshot"));
        assert!(!manager.exists());
        assert!(manager.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_committed_state_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("ledger.snapshot");
        let config = LedgerConfig::new().snapshot_path(&path);

        {
            let ledger = InMemoryLedger::open(config.clone()).unwrap();
            let tx = ledger.begin().await;
            tx.put_state("vehicle:V1", b"{}".to_vec()).await.unwrap();
            tx.put_private_data("prices", "V1", b"42".to_vec()).await.unwrap();
            tx.commit().await.unwrap();
        }

        assert!(SnapshotManager::new(&path).exists());

        let reopened = InMemoryLedger::open(config).unwrap();
        assert_eq!(reopened.height().await, 1);
        let tx = reopened.begin().await;
        assert_eq!(tx.get_state("vehicle:V1").await.unwrap(), Some(b"{}".to_vec()));
        assert_eq!(
            tx.get_private_data("prices", "V1").await.unwrap(),
            Some(b"42".to_vec())
        );
    }

    #[tokio::test]
    async fn test_uncommitted_state_not_persisted() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.snapshot");
        let ledger = InMemoryLedger::open(LedgerConfig::new().snapshot_path(&path)).unwrap();

        let tx = ledger.begin().await;
        tx.put_state("k", b"v".to_vec()).await.unwrap();
        drop(tx);

        assert!(!SnapshotManager::new(&path).exists());
    }
}
