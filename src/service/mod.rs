//! Lifecycle services. Each service checks preconditions through the typed lists,
//! applies the state change, and emits an event for meaningful transitions.
//!
//! A service reads and then writes within one invocation without holding any
//! lock in between. Protection against two invocations racing on the same key
//! comes from the ledger's commit-time read validation, not from this layer.

pub mod order;
pub mod policy;
pub mod price;
pub mod vehicle;

pub use order::OrderService;
pub use policy::PolicyService;
pub use price::PriceService;
pub use vehicle::VehicleService;

pub const ORDER_EVENT: &str = "ORDER_EVENT";
pub const REQUEST_VIN: &str = "REQUEST_VIN";
pub const VIN_ISSUED: &str = "VIN_ISSUED";
pub const CREATE_POLICY: &str = "CREATE_POLICY";
pub const POLICY_ISSUED: &str = "POLICY_ISSUED";
