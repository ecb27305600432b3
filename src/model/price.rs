use crate::codec::LedgerEntity;
use serde::{Deserialize, Serialize};

/// Vehicle price, kept in a private data collection apart from the vehicle record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub vehicle_id: String,
    pub amount: u64,
}

impl Price {
    pub fn new(vehicle_id: &str, amount: u64) -> Self {
        Self {
            vehicle_id: vehicle_id.to_string(),
            amount,
        }
    }
}

impl LedgerEntity for Price {
    const KIND: &'static str = "Price";
    const DOC_TYPE: &'static str = "price";
    const NAMESPACE: &'static str = "price";

    fn id(&self) -> &str {
        &self.vehicle_id
    }
}
