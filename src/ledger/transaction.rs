// ============================================================================
// Ledger Transaction
// ============================================================================
//
// One transaction per invocation. Reads come from the snapshot taken at begin and
// are recorded with the version they observed; writes and events are buffered.
// Commit re-checks every recorded read against the committed state and applies
// the write set only if nothing changed underneath. Dropping the transaction
// discards everything.
//
// ============================================================================

use super::memory::{InMemoryLedger, VersionedValue, WorldState};
use super::{ChaincodeEvent, KeyValue, LedgerStore, StateStream};
use crate::core::{LedgerError, Result};
use async_trait::async_trait;
use futures::StreamExt;
use futures::future::ready;
use futures::stream;
use im::OrdMap;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Bound;
use std::sync::Mutex;
use uuid::Uuid;

/// Unique identifier for an invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxId(Uuid);

impl TxId {
    pub fn new() -> Self {
        TxId(Uuid::new_v4())
    }
}

impl Default for TxId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum StateKey {
    Public(String),
    Private { collection: String, key: String },
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateKey::Public(key) => f.write_str(key),
            StateKey::Private { collection, key } => write!(f, "{}/{}", collection, key),
        }
    }
}

/// Keys read (with the version seen, `None` for absent) and pending writes
/// (`None` for delete).
#[derive(Debug, Default)]
pub(crate) struct ReadWriteSet {
    reads: BTreeMap<StateKey, Option<u64>>,
    writes: BTreeMap<StateKey, Option<Vec<u8>>>,
}

impl ReadWriteSet {
    fn record_read(&mut self, key: StateKey, version: Option<u64>) {
        self.reads.entry(key).or_insert(version);
    }

    fn record_write(&mut self, key: StateKey, value: Option<Vec<u8>>) {
        self.writes.insert(key, value);
    }

    pub(crate) fn reads(&self) -> impl Iterator<Item = (&StateKey, &Option<u64>)> {
        self.reads.iter()
    }

    pub(crate) fn write_count(&self) -> usize {
        self.writes.len()
    }

    pub(crate) fn into_writes(self) -> impl Iterator<Item = (StateKey, Option<Vec<u8>>)> {
        self.writes.into_iter()
    }
}

/// Outcome of a successful commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReceipt {
    pub tx_id: String,
    pub height: u64,
    pub writes: usize,
    pub events: Vec<ChaincodeEvent>,
}

pub struct LedgerTransaction<'l> {
    ledger: &'l InMemoryLedger,
    tx_id: TxId,
    snapshot: WorldState,
    rwset: Mutex<ReadWriteSet>,
    events: Mutex<Vec<ChaincodeEvent>>,
}

impl<'l> LedgerTransaction<'l> {
    pub(crate) fn new(ledger: &'l InMemoryLedger, tx_id: TxId, snapshot: WorldState) -> Self {
        Self {
            ledger,
            tx_id,
            snapshot,
            rwset: Mutex::new(ReadWriteSet::default()),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn id(&self) -> TxId {
        self.tx_id
    }

    /// Validate the read set and apply all buffered writes and events atomically
    pub async fn commit(self) -> Result<CommitReceipt> {
        let rwset = self.rwset.into_inner()?;
        let events = self.events.into_inner()?;
        self.ledger.apply_commit(self.tx_id, rwset, events).await
    }

    /// Discard buffered writes and events
    pub fn rollback(self) {
        log::debug!("rolled back tx={}", self.tx_id);
    }

    fn observe(&self, key: StateKey, found: Option<&VersionedValue>) -> Result<Option<Vec<u8>>> {
        self.rwset
            .lock()?
            .record_read(key, found.map(|v| v.version));
        Ok(found.map(|v| v.value.clone()))
    }

    fn stage(&self, key: StateKey, value: Option<Vec<u8>>) -> Result<()> {
        self.rwset.lock()?.record_write(key, value);
        Ok(())
    }

    fn scan<'a>(
        &'a self,
        entries: Option<&'a OrdMap<String, VersionedValue>>,
        collection: Option<String>,
        start: &str,
        end: &str,
    ) -> StateStream<'a> {
        let Some(entries) = entries else {
            return stream::empty().boxed();
        };
        if !end.is_empty() && start >= end {
            return stream::empty().boxed();
        }

        let upper = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end.to_string())
        };

        stream::unfold(Some(Bound::Included(start.to_string())), move |cursor| {
            let next = cursor.and_then(|lower| {
                entries
                    .range((lower, upper.clone()))
                    .next()
                    .map(|(key, value)| (key.clone(), value.clone()))
            });

            let item = next.map(|(key, versioned)| {
                let state_key = match &collection {
                    Some(collection) => StateKey::Private {
                        collection: collection.clone(),
                        key: key.clone(),
                    },
                    None => StateKey::Public(key.clone()),
                };
                let entry = self.observe(state_key, Some(&versioned)).map(|_| KeyValue {
                    key: key.clone(),
                    value: versioned.value,
                });
                (entry, Some(Bound::Excluded(key)))
            });

            ready(item)
        })
        .boxed()
    }
}

#[async_trait]
impl LedgerStore for LedgerTransaction<'_> {
    async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.observe(StateKey::Public(key.to_string()), self.snapshot.get(key))
    }

    async fn put_state(&self, key: &str, value: Vec<u8>) -> Result<()> {
        if key.is_empty() {
            return Err(LedgerError::InvalidArgument("key must not be empty".into()));
        }
        self.stage(StateKey::Public(key.to_string()), Some(value))
    }

    async fn delete_state(&self, key: &str) -> Result<()> {
        self.stage(StateKey::Public(key.to_string()), None)
    }

    fn get_state_by_range<'a>(&'a self, start: &str, end: &str) -> StateStream<'a> {
        self.scan(Some(&self.snapshot.public), None, start, end)
    }

    async fn get_private_data(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let state_key = StateKey::Private {
            collection: collection.to_string(),
            key: key.to_string(),
        };
        self.observe(state_key, self.snapshot.get_private(collection, key))
    }

    async fn put_private_data(&self, collection: &str, key: &str, value: Vec<u8>) -> Result<()> {
        if collection.is_empty() || key.is_empty() {
            return Err(LedgerError::InvalidArgument(
                "private data collection and key must not be empty".into(),
            ));
        }
        let state_key = StateKey::Private {
            collection: collection.to_string(),
            key: key.to_string(),
        };
        self.stage(state_key, Some(value))
    }

    async fn delete_private_data(&self, collection: &str, key: &str) -> Result<()> {
        let state_key = StateKey::Private {
            collection: collection.to_string(),
            key: key.to_string(),
        };
        self.stage(state_key, None)
    }

    fn get_private_data_by_range<'a>(
        &'a self,
        collection: &str,
        start: &str,
        end: &str,
    ) -> StateStream<'a> {
        self.scan(
            self.snapshot.private.get(collection),
            Some(collection.to_string()),
            start,
            end,
        )
    }

    fn set_event(&self, name: &str, payload: Vec<u8>) -> Result<()> {
        if name.is_empty() {
            return Err(LedgerError::InvalidArgument("event name must not be empty".into()));
        }
        self.events.lock()?.push(ChaincodeEvent {
            tx_id: self.tx_id.to_string(),
            channel: self.ledger.config().channel.clone(),
            chaincode: self.ledger.config().chaincode.clone(),
            name: name.to_string(),
            payload,
        });
        Ok(())
    }

    fn tx_id(&self) -> String {
        self.tx_id.to_string()
    }
}
