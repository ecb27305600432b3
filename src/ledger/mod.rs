// ============================================================================
// Ledger Store Adapter
// ============================================================================
//
// The contract sees the ledger only through `LedgerStore`: byte-oriented world
// state, ordered range scans, named private data collections and event emission.
// One store handle corresponds to one invocation; the platform behind it decides
// whether the invocation's writes commit.
//
// ============================================================================

pub mod memory;
pub mod persistence;
pub mod transaction;

pub use memory::InMemoryLedger;
pub use persistence::{LedgerSnapshot, SnapshotManager};
pub use transaction::{CommitReceipt, LedgerTransaction, TxId};

use crate::core::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

/// One entry produced by a range scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

/// Lazy, finite, key-ordered sequence of entries. Each call to a range method
/// produces a fresh stream.
pub type StateStream<'a> = BoxStream<'a, Result<KeyValue>>;

/// Named event published once the emitting invocation commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeEvent {
    pub tx_id: String,
    pub channel: String,
    pub chaincode: String,
    pub name: String,
    pub payload: Vec<u8>,
}

impl ChaincodeEvent {
    pub fn payload_str(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Returns `None` for an absent key; absence is not an error at this layer.
    async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>>;

    async fn put_state(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Deleting an absent key succeeds.
    async fn delete_state(&self, key: &str) -> Result<()>;

    /// Entries with `start <= key < end`. An empty `end` leaves the range open.
    fn get_state_by_range<'a>(&'a self, start: &str, end: &str) -> StateStream<'a>;

    async fn get_private_data(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>>;

    async fn put_private_data(&self, collection: &str, key: &str, value: Vec<u8>) -> Result<()>;

    async fn delete_private_data(&self, collection: &str, key: &str) -> Result<()>;

    fn get_private_data_by_range<'a>(
        &'a self,
        collection: &str,
        start: &str,
        end: &str,
    ) -> StateStream<'a>;

    /// Fire-and-forget; delivery happens only if the invocation commits.
    fn set_event(&self, name: &str, payload: Vec<u8>) -> Result<()>;

    /// Identifier of the invocation this handle belongs to.
    fn tx_id(&self) -> String;
}
