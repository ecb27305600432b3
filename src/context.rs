use crate::codec::{self, LedgerEntity};
use crate::collection::{OrderList, Partition, PolicyList, PriceList, StateList, VehicleList};
use crate::config::LedgerConfig;
use crate::core::{DERIVED_ID_SUFFIX_LEN, Result};
use crate::ledger::LedgerStore;

/// Per-invocation handle given to services: the store for this invocation plus
/// the typed lists built on top of it.
pub struct InvocationContext<'a> {
    store: &'a dyn LedgerStore,
    config: &'a LedgerConfig,
    function: &'a str,
}

impl<'a> InvocationContext<'a> {
    pub fn new(store: &'a dyn LedgerStore, config: &'a LedgerConfig, function: &'a str) -> Self {
        Self {
            store,
            config,
            function,
        }
    }

    pub fn function(&self) -> &str {
        self.function
    }

    pub fn tx_id(&self) -> String {
        self.store.tx_id()
    }

    pub fn config(&self) -> &LedgerConfig {
        self.config
    }

    fn public_list<E: LedgerEntity>(&self) -> StateList<'a, E> {
        StateList::new(self.store, Partition::Public).with_max_id_len(self.config.max_id_len)
    }

    /// Vehicle ids may be derived from an order id, so they get the suffix allowance
    pub fn vehicle_list(&self) -> VehicleList<'a> {
        StateList::new(self.store, Partition::Public).with_max_id_len(self.derived_id_len())
    }

    pub fn order_list(&self) -> OrderList<'a> {
        self.public_list()
    }

    pub fn policy_list(&self) -> PolicyList<'a> {
        self.public_list()
    }

    pub fn price_list(&self) -> PriceList<'a> {
        StateList::new(
            self.store,
            Partition::Private(self.config.price_collection.clone()),
        )
        .with_max_id_len(self.derived_id_len())
    }

    fn derived_id_len(&self) -> usize {
        self.config.max_id_len + DERIVED_ID_SUFFIX_LEN
    }

    /// Emit `name` with the entity as it is now as payload
    pub fn emit<E: LedgerEntity>(&self, name: &str, entity: &E) -> Result<()> {
        let payload = codec::encode(entity)?;
        tracing::debug!(event = name, id = entity.id(), "emitting chaincode event");
        self.store.set_event(name, payload)
    }
}
