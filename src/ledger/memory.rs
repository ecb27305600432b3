use super::persistence::{LedgerSnapshot, SnapshotManager};
use super::transaction::{CommitReceipt, LedgerTransaction, ReadWriteSet, StateKey, TxId};
use super::ChaincodeEvent;
use crate::config::LedgerConfig;
use crate::core::{LedgerError, Result};
use im::OrdMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

/// Stored bytes plus the commit height that wrote them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedValue {
    pub value: Vec<u8>,
    pub version: u64,
}

/// Committed world state. Cloning is O(1); `im` maps share structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldState {
    pub height: u64,
    pub public: OrdMap<String, VersionedValue>,
    pub private: OrdMap<String, OrdMap<String, VersionedValue>>,
}

impl WorldState {
    pub fn get(&self, key: &str) -> Option<&VersionedValue> {
        self.public.get(key)
    }

    pub fn get_private(&self, collection: &str, key: &str) -> Option<&VersionedValue> {
        self.private.get(collection).and_then(|entries| entries.get(key))
    }

    pub(crate) fn version_of(&self, key: &StateKey) -> Option<u64> {
        match key {
            StateKey::Public(key) => self.get(key),
            StateKey::Private { collection, key } => self.get_private(collection, key),
        }
        .map(|v| v.version)
    }

    fn apply(&mut self, key: StateKey, value: Option<Vec<u8>>, version: u64) {
        match (key, value) {
            (StateKey::Public(key), Some(value)) => {
                self.public.insert(key, VersionedValue { value, version });
            }
            (StateKey::Public(key), None) => {
                self.public.remove(&key);
            }
            (StateKey::Private { collection, key }, value) => {
                let mut entries = self.private.get(&collection).cloned().unwrap_or_default();
                match value {
                    Some(value) => {
                        entries.insert(key, VersionedValue { value, version });
                    }
                    None => {
                        entries.remove(&key);
                    }
                }
                self.private.insert(collection, entries);
            }
        }
    }
}

/// In-process ledger: snapshot reads, read-set validation and all-or-nothing commits.
pub struct InMemoryLedger {
    config: LedgerConfig,
    state: Arc<RwLock<WorldState>>,
    events: broadcast::Sender<ChaincodeEvent>,
    snapshots: Option<SnapshotManager>,
}

impl InMemoryLedger {
    /// Empty ledger with default configuration and no persistence
    pub fn new() -> Self {
        Self::from_state(LedgerConfig::default(), WorldState::default(), None)
    }

    /// Open a ledger, restoring committed state from the configured snapshot file
    pub fn open(config: LedgerConfig) -> Result<Self> {
        config.validate()?;

        let snapshots = config.snapshot_path.as_ref().map(SnapshotManager::new);
        let state = match &snapshots {
            Some(manager) => match manager.load()? {
                Some(snapshot) => {
                    log::info!(
                        "restored ledger snapshot: path={} height={} keys={}",
                        manager.path().display(),
                        snapshot.state.height,
                        snapshot.state.public.len()
                    );
                    snapshot.state
                }
                None => WorldState::default(),
            },
            None => WorldState::default(),
        };

        Ok(Self::from_state(config, state, snapshots))
    }

    fn from_state(
        config: LedgerConfig,
        state: WorldState,
        snapshots: Option<SnapshotManager>,
    ) -> Self {
        let (events, _) = broadcast::channel(config.event_buffer.max(1));
        Self {
            config,
            state: Arc::new(RwLock::new(state)),
            events,
            snapshots,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Start one invocation on a snapshot of the committed state
    pub async fn begin(&self) -> LedgerTransaction<'_> {
        let snapshot = self.state.read().await.clone();
        LedgerTransaction::new(self, TxId::new(), snapshot)
    }

    /// Receive events of every transaction committed after this call
    pub fn subscribe(&self) -> broadcast::Receiver<ChaincodeEvent> {
        self.events.subscribe()
    }

    pub async fn height(&self) -> u64 {
        self.state.read().await.height
    }

    /// Copy of the committed state
    pub async fn state(&self) -> WorldState {
        self.state.read().await.clone()
    }

    pub(crate) async fn apply_commit(
        &self,
        tx_id: TxId,
        rwset: ReadWriteSet,
        events: Vec<ChaincodeEvent>,
    ) -> Result<CommitReceipt> {
        let mut state = self.state.write().await;

        for (key, observed) in rwset.reads() {
            if state.version_of(key) != *observed {
                log::debug!("read conflict: tx={} key={}", tx_id, key);
                return Err(LedgerError::ReadConflict(key.to_string()));
            }
        }

        let mut next = state.clone();
        let height = next.height + 1;
        let writes = rwset.write_count();
        for (key, value) in rwset.into_writes() {
            next.apply(key, value, height);
        }
        next.height = height;

        // Snapshots are written under the write guard, in commit order. The file
        // I/O runs on the blocking pool.
        if let Some(manager) = self.snapshots.clone() {
            let snapshot = LedgerSnapshot::new(next.clone());
            tokio::task::spawn_blocking(move || manager.save(&snapshot))
                .await
                .map_err(|e| LedgerError::Storage(format!("Snapshot task failed: {}", e)))??;
        }
        *state = next;
        drop(state);

        for event in &events {
            // No subscribers is fine; events are fire-and-forget.
            let _ = self.events.send(event.clone());
        }

        log::debug!(
            "committed tx={} height={} writes={} events={}",
            tx_id,
            height,
            writes,
            events.len()
        );

        Ok(CommitReceipt {
            tx_id: tx_id.to_string(),
            height,
            writes,
            events,
        })
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}
