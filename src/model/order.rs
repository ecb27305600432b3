use super::parse_variant;
use super::vehicle::VehicleDetails;
use crate::codec::LedgerEntity;
use crate::core::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Issued,
    InProgress,
    Pending,
    Delivered,
}

impl OrderStatus {
    pub const ALL: [(OrderStatus, &'static str); 4] = [
        (Self::Issued, "ISSUED"),
        (Self::InProgress, "INPROGRESS"),
        (Self::Pending, "PENDING"),
        (Self::Delivered, "DELIVERED"),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Issued => "ISSUED",
            Self::InProgress => "INPROGRESS",
            Self::Pending => "PENDING",
            Self::Delivered => "DELIVERED",
        }
    }

    /// Validate a caller-directed status change.
    ///
    /// Only a transition to the current status is rejected. Any other pair is
    /// accepted, including backward moves such as DELIVERED -> ISSUED; there is no
    /// ordering between the statuses.
    pub fn transition(self, target: OrderStatus, order_id: &str) -> Result<OrderStatus> {
        if self == target {
            return Err(LedgerError::InvalidTransition(format!(
                "order '{}' is already {}",
                order_id,
                target.as_str()
            )));
        }
        Ok(target)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        parse_variant("orderStatus", s, &Self::ALL)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub owner: String,
    pub order_status: OrderStatus,
    pub vehicle_details: VehicleDetails,
}

impl Order {
    /// New orders start ISSUED
    pub fn new(id: &str, owner: &str, vehicle_details: VehicleDetails) -> Self {
        Self {
            id: id.to_string(),
            owner: owner.to_string(),
            order_status: OrderStatus::Issued,
            vehicle_details,
        }
    }

    pub fn set_status(&mut self, target: OrderStatus) -> Result<()> {
        self.order_status = self.order_status.transition(target, &self.id)?;
        Ok(())
    }

    pub fn is_status(&self, status: OrderStatus) -> bool {
        self.order_status == status
    }
}

impl LedgerEntity for Order {
    const KIND: &'static str = "Order";
    const DOC_TYPE: &'static str = "order";
    const NAMESPACE: &'static str = "order";

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Order {
        Order::new(
            "O1",
            "Alice",
            VehicleDetails::new("O1", "Alice", "Tesla", "S", "black"),
        )
    }

    #[test]
    fn test_self_transition_rejected() {
        for (status, _) in OrderStatus::ALL {
            assert!(matches!(
                status.transition(status, "O1"),
                Err(LedgerError::InvalidTransition(_))
            ));
        }
    }

    #[test]
    fn test_any_other_transition_accepted() {
        for (from, _) in OrderStatus::ALL {
            for (to, _) in OrderStatus::ALL {
                if from != to {
                    assert_eq!(from.transition(to, "O1").unwrap(), to);
                }
            }
        }
    }

    #[test]
    fn test_backward_transition_is_permitted() {
        let mut o = order();
        o.set_status(OrderStatus::Delivered).unwrap();
        o.set_status(OrderStatus::Issued).unwrap();
        assert!(o.is_status(OrderStatus::Issued));
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("DELIVERED".parse::<OrderStatus>().unwrap(), OrderStatus::Delivered);
        assert_eq!("in_progress".parse::<OrderStatus>().unwrap(), OrderStatus::InProgress);
        assert_eq!("InProgress".parse::<OrderStatus>().unwrap(), OrderStatus::InProgress);
        assert_eq!("2".parse::<OrderStatus>().unwrap(), OrderStatus::Pending);
        assert!("SHIPPED".parse::<OrderStatus>().is_err());
        assert!("9".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_upper_case() {
        let json = serde_json::to_value(order()).unwrap();
        assert_eq!(json["orderStatus"], "ISSUED");
        assert_eq!(json["vehicleDetails"]["orderId"], "O1");

        let json = serde_json::to_value(OrderStatus::InProgress).unwrap();
        assert_eq!(json, "INPROGRESS");
    }
}
