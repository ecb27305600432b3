// ============================================================================
// Vehicle Ledger Library
// ============================================================================
//
// Vehicle lifecycle contract over a key/value ledger: orders become vehicles,
// vehicles receive VINs and insurance policies, and prices live in a private
// data collection.
//
// ============================================================================

pub mod codec;
pub mod collection;
pub mod config;
pub mod context;
pub mod contract;
pub mod core;
pub mod ledger;
pub mod model;
pub mod service;

pub use codec::LedgerEntity;
pub use collection::{Partition, QueryRecord, RecordValue, StateList};
pub use config::LedgerConfig;
pub use context::InvocationContext;
pub use contract::{Args, ContractService, Submission, VehicleContract};
pub use crate::core::{LedgerError, Result};
pub use ledger::{ChaincodeEvent, CommitReceipt, InMemoryLedger, KeyValue, LedgerStore};
pub use model::{
    Order, OrderStatus, Policy, PolicyStatus, PolicyType, Price, Vehicle, VehicleDetails,
    VinStatus,
};

/// Convert string literals into an owned argument list.
///
/// # Examples
///
/// ```
/// use vehicle_ledger::{InMemoryLedger, VehicleContract, args};
///
/// # tokio_test::block_on(async {
/// let ledger = InMemoryLedger::new();
/// let contract = VehicleContract::default();
///
/// contract
///     .submit(&ledger, "placeOrder", &args(&["O1", "Alice", "Tesla", "S", "black"]))
///     .await
///     .unwrap();
///
/// let payload = contract
///     .evaluate(&ledger, "getOrder", &args(&["O1"]))
///     .await
///     .unwrap();
/// assert!(String::from_utf8(payload).unwrap().contains("\"orderStatus\":\"ISSUED\""));
/// # });
/// ```
pub fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
