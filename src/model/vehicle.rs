use crate::codec::LedgerEntity;
use crate::core::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// VIN issuance status. Only moves forward: UNISSUED -> REQUESTED -> ISSUED,
/// with a direct UNISSUED -> ISSUED issue allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VinStatus {
    #[default]
    Unissued,
    Requested,
    Issued,
}

impl VinStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unissued => "UNISSUED",
            Self::Requested => "REQUESTED",
            Self::Issued => "ISSUED",
        }
    }

    fn rank(self) -> u8 {
        match self {
            Self::Unissued => 0,
            Self::Requested => 1,
            Self::Issued => 2,
        }
    }

    /// Status after a VIN request for `vehicle_id`
    pub fn request(self, vehicle_id: &str) -> Result<Self> {
        if self.rank() >= Self::Requested.rank() {
            return Err(LedgerError::InvalidTransition(format!(
                "VIN for vehicle '{}' is already {}",
                vehicle_id,
                self.as_str()
            )));
        }
        Ok(Self::Requested)
    }

    /// Status after issuing a VIN for `vehicle_id`; issuing does not require a prior request
    pub fn issue(self, vehicle_id: &str) -> Result<Self> {
        if self == Self::Issued {
            return Err(LedgerError::InvalidTransition(format!(
                "VIN for vehicle '{}' is already ISSUED",
                vehicle_id
            )));
        }
        Ok(Self::Issued)
    }
}

impl fmt::Display for VinStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the vehicle an order asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDetails {
    pub order_id: String,
    pub owner: String,
    pub make: String,
    pub model: String,
    pub color: String,
}

impl VehicleDetails {
    pub fn new(order_id: &str, owner: &str, make: &str, model: &str, color: &str) -> Self {
        Self {
            order_id: order_id.to_string(),
            owner: owner.to_string(),
            make: make.to_string(),
            model: model.to_string(),
            color: color.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    #[serde(default)]
    pub vin_status: VinStatus,
    pub owner: String,
    pub make: String,
    pub model: String,
    pub color: String,
    pub order_id: String,
}

impl Vehicle {
    pub fn new(id: &str, order_id: &str, owner: &str, make: &str, model: &str, color: &str) -> Self {
        Self {
            id: id.to_string(),
            vin: None,
            vin_status: VinStatus::Unissued,
            owner: owner.to_string(),
            make: make.to_string(),
            model: model.to_string(),
            color: color.to_string(),
            order_id: order_id.to_string(),
        }
    }

    pub fn request_vin(&mut self) -> Result<()> {
        self.vin_status = self.vin_status.request(&self.id)?;
        Ok(())
    }

    pub fn issue_vin(&mut self, vin: &str) -> Result<()> {
        self.vin_status = self.vin_status.issue(&self.id)?;
        self.vin = Some(vin.to_string());
        Ok(())
    }
}

impl LedgerEntity for Vehicle {
    const KIND: &'static str = "Vehicle";
    const DOC_TYPE: &'static str = "vehicle";
    const NAMESPACE: &'static str = "vehicle";

    fn id(&self) -> &str {
        &self.id
    }
}
