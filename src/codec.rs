//! JSON encoding of ledger entities.
//!
//! Every stored entity is a JSON object stamped with a `docType` discriminator.
//! Decoding checks the discriminator before handing the object to serde.

use crate::core::{LedgerError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const DOC_TYPE_FIELD: &str = "docType";

/// An entity that lives under its own key namespace in the ledger.
pub trait LedgerEntity: Serialize + DeserializeOwned + Send + Sync {
    /// Human-readable kind used in error messages
    const KIND: &'static str;

    /// Value of the `docType` discriminator
    const DOC_TYPE: &'static str;

    /// Key prefix; keys are `<NAMESPACE>:<id>`
    const NAMESPACE: &'static str;

    fn id(&self) -> &str;
}

pub fn encode<E: LedgerEntity>(entity: &E) -> Result<Vec<u8>> {
    let mut value = serde_json::to_value(entity).map_err(|e| {
        LedgerError::Storage(format!("Failed to encode {} '{}': {}", E::KIND, entity.id(), e))
    })?;

    let Some(object) = value.as_object_mut() else {
        return Err(LedgerError::Storage(format!(
            "{} '{}' does not encode to a JSON object",
            E::KIND,
            entity.id()
        )));
    };
    object.insert(DOC_TYPE_FIELD.to_string(), Value::String(E::DOC_TYPE.to_string()));

    serde_json::to_vec(&value).map_err(|e| {
        LedgerError::Storage(format!("Failed to encode {} '{}': {}", E::KIND, entity.id(), e))
    })
}

pub fn decode<E: LedgerEntity>(key: &str, bytes: &[u8]) -> Result<E> {
    let mut value: Value = serde_json::from_slice(bytes).map_err(|e| LedgerError::decode(key, e))?;

    let Some(object) = value.as_object_mut() else {
        return Err(LedgerError::decode(key, "expected a JSON object"));
    };

    match object.remove(DOC_TYPE_FIELD) {
        Some(Value::String(doc_type)) if doc_type == E::DOC_TYPE => {}
        Some(other) => {
            return Err(LedgerError::decode(
                key,
                format!("docType {} is not '{}'", other, E::DOC_TYPE),
            ));
        }
        None => return Err(LedgerError::decode(key, "missing docType")),
    }

    serde_json::from_value(value).map_err(|e| LedgerError::decode(key, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Order, OrderStatus, Vehicle, VehicleDetails, VinStatus};

    #[test]
    fn test_encode_stamps_doc_type() {
        let vehicle = Vehicle::new("V1", "O1", "Alice", "Toyota", "Prius", "blue");
        let bytes = encode(&vehicle).unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["docType"], "vehicle");
        assert_eq!(json["vinStatus"], "UNISSUED");
        assert_eq!(json["orderId"], "O1");
        assert!(json.get("vin").is_none());
    }

    #[test]
    fn test_decode_restores_enum_fields() {
        let mut vehicle = Vehicle::new("V1", "O1", "Alice", "Toyota", "Prius", "blue");
        vehicle.vin_status = VinStatus::Issued;
        vehicle.vin = Some("1HGCM82633A004352".into());

        let decoded: Vehicle = decode("vehicle:V1", &encode(&vehicle).unwrap()).unwrap();
        assert_eq!(decoded, vehicle);
    }

    #[test]
    fn test_decode_rejects_other_doc_type() {
        let order = Order::new(
            "O1",
            "Alice",
            VehicleDetails::new("O1", "Alice", "Toyota", "Prius", "blue"),
        );
        assert_eq!(order.order_status, OrderStatus::Issued);

        let bytes = encode(&order).unwrap();
        let err = decode::<Vehicle>("vehicle:O1", &bytes).unwrap_err();
        assert!(matches!(err, LedgerError::Decode { .. }));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode::<Vehicle>("vehicle:x", b"not json"),
            Err(LedgerError::Decode { .. })
        ));
        assert!(matches!(
            decode::<Vehicle>("vehicle:x", b"[1,2]"),
            Err(LedgerError::Decode { .. })
        ));
        assert!(matches!(
            decode::<Vehicle>("vehicle:x", br#"{"id":"x"}"#),
            Err(LedgerError::Decode { .. })
        ));
    }
}
