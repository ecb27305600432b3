use super::parse_variant;
use crate::codec::LedgerEntity;
use crate::core::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyType {
    ThirdParty,
    FireAndTheft,
    FullCover,
}

impl PolicyType {
    pub const ALL: [(PolicyType, &'static str); 3] = [
        (Self::ThirdParty, "THIRD_PARTY"),
        (Self::FireAndTheft, "FIRE_AND_THEFT"),
        (Self::FullCover, "FULL_COVER"),
    ];
}

impl FromStr for PolicyType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        parse_variant("policyType", s, &Self::ALL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PolicyStatus {
    Requested,
    Issued,
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Requested => f.write_str("REQUESTED"),
            Self::Issued => f.write_str("ISSUED"),
        }
    }
}

/// Insurance policy on a vehicle. Dates are milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub id: String,
    #[serde(alias = "vin")]
    pub vehicle_id: String,
    pub insurer_id: String,
    pub holder_id: String,
    pub policy_type: PolicyType,
    pub status: PolicyStatus,
    pub start_date: i64,
    pub end_date: i64,
}

impl Policy {
    /// New policies start REQUESTED; the term must not end before it starts
    pub fn request(
        id: &str,
        vehicle_id: &str,
        insurer_id: &str,
        holder_id: &str,
        policy_type: PolicyType,
        start_date: i64,
        end_date: i64,
    ) -> Result<Self> {
        if end_date < start_date {
            return Err(LedgerError::InvalidArgument(format!(
                "policy '{}' ends ({}) before it starts ({})",
                id, end_date, start_date
            )));
        }

        Ok(Self {
            id: id.to_string(),
            vehicle_id: vehicle_id.to_string(),
            insurer_id: insurer_id.to_string(),
            holder_id: holder_id.to_string(),
            policy_type,
            status: PolicyStatus::Requested,
            start_date,
            end_date,
        })
    }

    // Re-issuing an ISSUED policy is accepted; no guard exists for it.
    pub fn issue(&mut self) {
        self.status = PolicyStatus::Issued;
    }
}

impl LedgerEntity for Policy {
    const KIND: &'static str = "Policy";
    const DOC_TYPE: &'static str = "policy";
    const NAMESPACE: &'static str = "policy";

    fn id(&self) -> &str {
        &self.id
    }
}
