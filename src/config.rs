use crate::core::ident::DEFAULT_MAX_ID_LEN;
use crate::core::{LedgerError, Result};
use std::path::PathBuf;

pub const DEFAULT_CHANNEL: &str = "mychannel";
pub const DEFAULT_CHAINCODE: &str = "vehicle-manufacture";
pub const DEFAULT_PRICE_COLLECTION: &str = "collectionVehiclePriceDetails";

/// Ledger and contract configuration
///
/// Similar to a peer connection profile, reduced to what the contract needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Channel the contract is deployed to
    pub channel: String,

    /// Chaincode name, reported with every emitted event
    pub chaincode: String,

    /// Private data collection holding vehicle prices
    pub price_collection: String,

    /// Snapshot file for the in-process ledger (no persistence when unset)
    pub snapshot_path: Option<PathBuf>,

    /// Capacity of the committed-event broadcast channel
    pub event_buffer: usize,

    /// Maximum identifier length accepted at the invocation boundary
    pub max_id_len: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            channel: DEFAULT_CHANNEL.to_string(),
            chaincode: DEFAULT_CHAINCODE.to_string(),
            price_collection: DEFAULT_PRICE_COLLECTION.to_string(),
            snapshot_path: None,
            event_buffer: 256,
            max_id_len: DEFAULT_MAX_ID_LEN,
        }
    }
}

impl LedgerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the channel name
    pub fn channel(mut self, channel: &str) -> Self {
        self.channel = channel.to_string();
        self
    }

    /// Set the chaincode name
    pub fn chaincode(mut self, chaincode: &str) -> Self {
        self.chaincode = chaincode.to_string();
        self
    }

    /// Set the private collection used for prices
    pub fn price_collection(mut self, collection: &str) -> Self {
        self.price_collection = collection.to_string();
        self
    }

    /// Persist committed state to this file
    pub fn snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    /// Set the event channel capacity
    pub fn event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity;
        self
    }

    /// Set the identifier length limit
    pub fn max_id_len(mut self, max: usize) -> Self {
        self.max_id_len = max;
        self
    }

    /// Load overrides from `VEHICLE_LEDGER_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(channel) = lookup("VEHICLE_LEDGER_CHANNEL") {
            config.channel = channel;
        }
        if let Some(chaincode) = lookup("VEHICLE_LEDGER_CHAINCODE") {
            config.chaincode = chaincode;
        }
        if let Some(collection) = lookup("VEHICLE_LEDGER_PRICE_COLLECTION") {
            config.price_collection = collection;
        }
        if let Some(path) = lookup("VEHICLE_LEDGER_SNAPSHOT") {
            config.snapshot_path = Some(PathBuf::from(path));
        }
        if let Some(buffer) = lookup("VEHICLE_LEDGER_EVENT_BUFFER") {
            config.event_buffer = buffer.parse().map_err(|_| {
                LedgerError::InvalidArgument(format!(
                    "VEHICLE_LEDGER_EVENT_BUFFER must be a positive integer, got '{}'",
                    buffer
                ))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.channel.trim().is_empty() {
            return Err(LedgerError::InvalidArgument("channel must not be empty".into()));
        }
        if self.price_collection.trim().is_empty() {
            return Err(LedgerError::InvalidArgument(
                "price collection must not be empty".into(),
            ));
        }
        if self.event_buffer == 0 {
            return Err(LedgerError::InvalidArgument(
                "event buffer must be at least 1".into(),
            ));
        }
        if self.max_id_len == 0 {
            return Err(LedgerError::InvalidArgument(
                "identifier length limit must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
