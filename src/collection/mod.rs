pub mod state_list;

pub use state_list::{Partition, QueryRecord, RecordValue, StateList};

use crate::core::Result;
use crate::model::{Order, Policy, Price, Vehicle};

pub type VehicleList<'a> = StateList<'a, Vehicle>;
pub type OrderList<'a> = StateList<'a, Order>;
pub type PolicyList<'a> = StateList<'a, Policy>;
pub type PriceList<'a> = StateList<'a, Price>;

impl StateList<'_, Vehicle> {
    pub async fn get_vehicle(&self, id: &str) -> Result<Vehicle> {
        self.get(id).await
    }

    pub async fn update_vehicle(&self, vehicle: &Vehicle) -> Result<()> {
        self.update(vehicle).await
    }
}

impl StateList<'_, Order> {
    pub async fn get_order(&self, id: &str) -> Result<Order> {
        self.get(id).await
    }

    pub async fn update_order(&self, order: &Order) -> Result<()> {
        self.update(order).await
    }
}
