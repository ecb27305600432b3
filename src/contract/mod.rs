// ============================================================================
// Contract Dispatch
// ============================================================================
//
// An invocation names a transaction function and passes string arguments.
// Services register the functions they handle; the contract routes each
// invocation to the first service that claims the name, the same way a
// statement pipeline routes to executors.
//
// ============================================================================

pub mod args;

pub use args::Args;

use crate::config::LedgerConfig;
use crate::context::InvocationContext;
use crate::core::{LedgerError, Result};
use crate::ledger::{CommitReceipt, InMemoryLedger, LedgerStore};
use crate::service::{OrderService, PolicyService, PriceService, VehicleService};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{Instrument, Level, event, info_span};

#[async_trait]
pub trait ContractService: Send + Sync {
    /// Name of the service for debugging
    fn name(&self) -> &'static str;

    /// Transaction functions this service handles
    fn transactions(&self) -> &'static [&'static str];

    fn can_handle(&self, function: &str) -> bool {
        self.transactions().contains(&function)
    }

    async fn invoke(&self, ctx: &InvocationContext<'_>, args: Args<'_>) -> Result<Vec<u8>>;
}

/// JSON response payload
pub fn json_payload<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value)
        .map_err(|e| LedgerError::Storage(format!("Failed to encode response: {}", e)))
}

/// Result of a committed invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub payload: Vec<u8>,
    pub receipt: CommitReceipt,
}

pub struct VehicleContract {
    config: LedgerConfig,
    services: Vec<Box<dyn ContractService>>,
}

impl VehicleContract {
    pub const NAME: &'static str = "org.vehiclelifecycle.vehicle";

    pub fn new(config: LedgerConfig) -> Self {
        let mut contract = Self {
            config,
            services: Vec::new(),
        };
        contract.register(Box::new(VehicleService));
        contract.register(Box::new(OrderService));
        contract.register(Box::new(PolicyService));
        contract.register(Box::new(PriceService));
        contract
    }

    pub fn register(&mut self, service: Box<dyn ContractService>) {
        self.services.push(service);
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// All registered transaction function names
    pub fn transactions(&self) -> Vec<&'static str> {
        self.services
            .iter()
            .flat_map(|s| s.transactions().iter().copied())
            .collect()
    }

    /// Run one invocation against `store`. Commit or rollback is up to the caller.
    pub async fn invoke(
        &self,
        store: &dyn LedgerStore,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>> {
        let function = function
            .strip_prefix(Self::NAME)
            .and_then(|rest| rest.strip_prefix(':'))
            .unwrap_or(function);

        let span = info_span!(
            "invoke",
            channel = %self.config.channel,
            fcn = %function,
            tx_id = %store.tx_id()
        );
        async move {
            event!(Level::INFO, "before transaction function");

            let Some(service) = self.services.iter().find(|s| s.can_handle(function)) else {
                event!(Level::WARN, "unknown transaction function");
                return Err(LedgerError::UnknownTransaction(function.to_string()));
            };

            let ctx = InvocationContext::new(store, &self.config, function);
            let result = service.invoke(&ctx, Args::new(function, args)).await;

            match &result {
                Ok(payload) => event!(
                    Level::INFO,
                    service = service.name(),
                    bytes = payload.len(),
                    "after transaction function"
                ),
                Err(err) if err.is_caller_error() => event!(
                    Level::WARN,
                    service = service.name(),
                    error = %err,
                    "transaction function rejected"
                ),
                Err(err) => event!(
                    Level::ERROR,
                    service = service.name(),
                    error = %err,
                    "transaction function failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Run an invocation in a fresh ledger transaction and commit it on success
    pub async fn submit(
        &self,
        ledger: &InMemoryLedger,
        function: &str,
        args: &[String],
    ) -> Result<Submission> {
        let tx = ledger.begin().await;
        match self.invoke(&tx, function, args).await {
            Ok(payload) => {
                let receipt = tx.commit().await?;
                Ok(Submission { payload, receipt })
            }
            Err(err) => {
                tx.rollback();
                Err(err)
            }
        }
    }

    /// Run an invocation without committing anything
    pub async fn evaluate(
        &self,
        ledger: &InMemoryLedger,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>> {
        let tx = ledger.begin().await;
        let result = self.invoke(&tx, function, args).await;
        tx.rollback();
        result
    }
}

impl Default for VehicleContract {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}
