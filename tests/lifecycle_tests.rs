//! End-to-end vehicle lifecycle through the contract entry points
//! Run with: cargo test --test lifecycle_tests

use serde_json::Value;
use vehicle_ledger::{InMemoryLedger, LedgerError, LedgerStore, VehicleContract, args};

async fn submit(ledger: &InMemoryLedger, contract: &VehicleContract, fcn: &str, values: &[&str]) -> Value {
    let submission = contract.submit(ledger, fcn, &args(values)).await.unwrap();
    if submission.payload.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&submission.payload).unwrap()
}

async fn query(ledger: &InMemoryLedger, contract: &VehicleContract, fcn: &str, values: &[&str]) -> Value {
    let payload = contract.evaluate(ledger, fcn, &args(values)).await.unwrap();
    serde_json::from_slice(&payload).unwrap()
}

async fn delivered_order(ledger: &InMemoryLedger, contract: &VehicleContract, order_id: &str) {
    submit(ledger, contract, "placeOrder", &[order_id, "Alice", "Tesla", "S", "black"]).await;
    submit(ledger, contract, "updateOrderDelivered", &[order_id]).await;
}

#[tokio::test]
async fn test_order_to_insured_vehicle() {
    let ledger = InMemoryLedger::new();
    let contract = VehicleContract::default();

    let order = submit(&ledger, &contract, "placeOrder", &["O1", "Alice", "Tesla", "S", "black"]).await;
    assert_eq!(order["orderStatus"], "ISSUED");
    assert_eq!(order["vehicleDetails"]["make"], "Tesla");

    submit(&ledger, &contract, "updateOrderStatusInProgress", &["O1"]).await;
    submit(&ledger, &contract, "updateOrderStatusPending", &["O1"]).await;
    let order = submit(&ledger, &contract, "updateOrderDelivered", &["O1", "legacy"]).await;
    assert_eq!(order["orderStatus"], "DELIVERED");

    let vehicle = submit(&ledger, &contract, "createVehicle", &["O1", "Tesla", "S", "black", "Alice"]).await;
    let vehicle_id = vehicle["id"].as_str().unwrap().to_string();
    assert_eq!(vehicle_id, "O1-V1");
    assert_eq!(vehicle["vinStatus"], "UNISSUED");
    assert_eq!(vehicle["orderId"], "O1");

    let vehicle = submit(&ledger, &contract, "requestVehicleVIN", &[vehicle_id.as_str()]).await;
    assert_eq!(vehicle["vinStatus"], "REQUESTED");

    let vehicle = submit(&ledger, &contract, "issueVehicleVIN", &[vehicle_id.as_str(), "5YJSA1E26HF000001"]).await;
    assert_eq!(vehicle["vinStatus"], "ISSUED");
    assert_eq!(vehicle["vin"], "5YJSA1E26HF000001");

    let policy = submit(
        &ledger,
        &contract,
        "requestPolicy",
        &["P1", vehicle_id.as_str(), "Insurer", "Alice", "FULL_COVER", "2024-01-01", "2025-01-01"],
    )
    .await;
    assert_eq!(policy["status"], "REQUESTED");
    assert_eq!(policy["policyType"], "FULL_COVER");

    let policy = submit(&ledger, &contract, "issuePolicy", &["P1"]).await;
    assert_eq!(policy["status"], "ISSUED");

    submit(&ledger, &contract, "updatePriceDetails", &[vehicle_id.as_str(), "42000"]).await;
    let price = query(&ledger, &contract, "getPriceDetails", &[vehicle_id.as_str()]).await;
    assert_eq!(price["amount"], 42000);

    submit(&ledger, &contract, "changeVehicleOwner", &[vehicle_id.as_str(), "Bob"]).await;
    let vehicle = query(&ledger, &contract, "queryVehicle", &[vehicle_id.as_str()]).await;
    assert_eq!(vehicle["owner"], "Bob");
    assert_eq!(vehicle["vinStatus"], "ISSUED");
}

#[tokio::test]
async fn test_create_vehicle_requires_delivered_order() {
    let ledger = InMemoryLedger::new();
    let contract = VehicleContract::default();

    let err = contract
        .submit(&ledger, "createVehicle", &args(&["O9", "Tesla", "S", "black", "Alice"]))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::PreconditionFailed(_)));

    submit(&ledger, &contract, "placeOrder", &["O1", "Alice", "Tesla", "S", "black"]).await;
    let err = contract
        .submit(&ledger, "createVehicle", &args(&["O1", "Tesla", "S", "black", "Alice"]))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::PreconditionFailed(_)));
    assert_eq!(query(&ledger, &contract, "getVehicleCount", &[]).await, 0);
}

#[tokio::test]
async fn test_one_order_can_produce_several_vehicles() {
    let ledger = InMemoryLedger::new();
    let contract = VehicleContract::default();
    delivered_order(&ledger, &contract, "O1").await;

    let first = submit(&ledger, &contract, "createVehicle", &["O1", "Tesla", "S", "black", "Alice"]).await;
    let second = submit(&ledger, &contract, "createVehicle", &["O1", "Tesla", "S", "black", "Alice"]).await;
    assert_eq!(first["id"], "O1-V1");
    assert_eq!(second["id"], "O1-V2");

    // A freed sequence number is reused
    contract.submit(&ledger, "deleteVehicle", &args(&["O1-V1"])).await.unwrap();
    let third = submit(&ledger, &contract, "createVehicle", &["O1", "Tesla", "S", "red", "Alice"]).await;
    assert_eq!(third["id"], "O1-V1");
    assert_eq!(query(&ledger, &contract, "getVehicleCount", &[]).await, 2);
}

#[tokio::test]
async fn test_longest_order_id_still_produces_vehicles() {
    let ledger = InMemoryLedger::new();
    let contract = VehicleContract::default();
    let order_id = "O".repeat(64);
    delivered_order(&ledger, &contract, &order_id).await;

    let vehicle = submit(&ledger, &contract, "createVehicle", &[order_id.as_str(), "Tesla", "S", "black", "Alice"]).await;
    let vehicle_id = format!("{}-V1", order_id);
    assert_eq!(vehicle["id"], vehicle_id.as_str());

    submit(&ledger, &contract, "requestVehicleVIN", &[vehicle_id.as_str()]).await;
    submit(&ledger, &contract, "updatePriceDetails", &[vehicle_id.as_str(), "10"]).await;
    let policy = submit(
        &ledger,
        &contract,
        "requestPolicy",
        &["P1", vehicle_id.as_str(), "Insurer", "Alice", "FULL_COVER", "0", "1"],
    )
    .await;
    assert_eq!(policy["vehicleId"], vehicle_id.as_str());

    let too_long = "O".repeat(65);
    let err = contract
        .submit(&ledger, "placeOrder", &args(&[too_long.as_str(), "Alice", "Tesla", "S", "black"]))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_undecodable_vehicle_keeps_its_slot() {
    let ledger = InMemoryLedger::new();
    let contract = VehicleContract::default();
    delivered_order(&ledger, &contract, "O1").await;

    let tx = ledger.begin().await;
    tx.put_state("vehicle:O1-V1", b"legacy garbage".to_vec()).await.unwrap();
    tx.commit().await.unwrap();

    let vehicle = submit(&ledger, &contract, "createVehicle", &["O1", "Tesla", "S", "black", "Alice"]).await;
    assert_eq!(vehicle["id"], "O1-V2");

    // The stale record can still be cleared, which frees its slot
    contract.submit(&ledger, "deleteVehicle", &args(&["O1-V1"])).await.unwrap();
    assert!(ledger.state().await.get("vehicle:O1-V1").is_none());

    let vehicle = submit(&ledger, &contract, "createVehicle", &["O1", "Tesla", "S", "red", "Alice"]).await;
    assert_eq!(vehicle["id"], "O1-V1");
}

#[tokio::test]
async fn test_vin_status_only_moves_forward() {
    let ledger = InMemoryLedger::new();
    let contract = VehicleContract::default();
    delivered_order(&ledger, &contract, "O1").await;
    submit(&ledger, &contract, "createVehicle", &["O1", "Tesla", "S", "black", "Alice"]).await;

    submit(&ledger, &contract, "requestVehicleVIN", &["O1-V1"]).await;
    let err = contract
        .submit(&ledger, "requestVehicleVIN", &args(&["O1-V1"]))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidTransition(_)));

    submit(&ledger, &contract, "issueVehicleVIN", &["O1-V1", "VIN1"]).await;
    for (fcn, values) in [
        ("requestVehicleVIN", vec!["O1-V1"]),
        ("issueVehicleVIN", vec!["O1-V1", "VIN2"]),
    ] {
        let err = contract.submit(&ledger, fcn, &args(&values)).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidTransition(_)), "{}: {:?}", fcn, err);
    }

    let vehicle = query(&ledger, &contract, "queryVehicle", &["O1-V1"]).await;
    assert_eq!(vehicle["vin"], "VIN1");
}

#[tokio::test]
async fn test_vin_can_be_issued_without_request() {
    let ledger = InMemoryLedger::new();
    let contract = VehicleContract::default();
    delivered_order(&ledger, &contract, "O1").await;
    submit(&ledger, &contract, "createVehicle", &["O1", "Tesla", "S", "black", "Alice"]).await;

    let vehicle = submit(&ledger, &contract, "issueVehicleVIN", &["O1-V1", "VIN1"]).await;
    assert_eq!(vehicle["vinStatus"], "ISSUED");
}

#[tokio::test]
async fn test_order_status_changes() {
    let ledger = InMemoryLedger::new();
    let contract = VehicleContract::default();
    submit(&ledger, &contract, "placeOrder", &["O1", "Alice", "Tesla", "S", "black"]).await;

    // Re-applying the current status is rejected
    submit(&ledger, &contract, "updateOrderStatusPending", &["O1"]).await;
    let err = contract
        .submit(&ledger, "updateOrderStatusPending", &args(&["O1"]))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidTransition(_)));

    // Skipping ahead and moving back are both accepted
    submit(&ledger, &contract, "updateOrderDelivered", &["O1"]).await;
    let order = submit(&ledger, &contract, "updateOrderStatusInProgress", &["O1"]).await;
    assert_eq!(order["orderStatus"], "INPROGRESS");

    let err = contract
        .submit(&ledger, "updateOrderStatusPending", &args(&["O404"]))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { .. }));
}

#[tokio::test]
async fn test_orders_by_status() {
    let ledger = InMemoryLedger::new();
    let contract = VehicleContract::default();
    for id in ["O1", "O2", "O3"] {
        submit(&ledger, &contract, "placeOrder", &[id, "Alice", "Tesla", "S", "black"]).await;
    }
    submit(&ledger, &contract, "updateOrderDelivered", &["O2"]).await;

    let delivered = query(&ledger, &contract, "getOrdersByStatus", &["DELIVERED"]).await;
    let ids: Vec<_> = delivered.as_array().unwrap().iter().map(|o| o["id"].clone()).collect();
    assert_eq!(ids, vec![Value::from("O2")]);

    let issued = query(&ledger, &contract, "getOrdersByStatus", &["issued"]).await;
    assert_eq!(issued.as_array().unwrap().len(), 2);

    let all = query(&ledger, &contract, "getOrders", &[]).await;
    let keys: Vec<_> = all.as_array().unwrap().iter().map(|r| r["Key"].clone()).collect();
    assert_eq!(keys, vec![Value::from("order:O1"), Value::from("order:O2"), Value::from("order:O3")]);
    assert_eq!(all[1]["Record"]["orderStatus"], "DELIVERED");
}

#[tokio::test]
async fn test_policy_requires_existing_vehicle() {
    let ledger = InMemoryLedger::new();
    let contract = VehicleContract::default();
    let policy_args = ["P1", "O1-V1", "Insurer", "Alice", "THIRD_PARTY", "1704067200000", "1735689600000"];

    let err = contract
        .submit(&ledger, "requestPolicy", &args(&policy_args))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::PreconditionFailed(_)));

    delivered_order(&ledger, &contract, "O1").await;
    submit(&ledger, &contract, "createVehicle", &["O1", "Tesla", "S", "black", "Alice"]).await;

    let policy = submit(&ledger, &contract, "requestPolicy", &policy_args).await;
    assert_eq!(policy["vehicleId"], "O1-V1");
    assert_eq!(policy["startDate"], 1_704_067_200_000i64);

    let err = contract
        .submit(&ledger, "requestPolicy", &args(&policy_args))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyExists { .. }));

    // Issuing twice is accepted
    submit(&ledger, &contract, "issuePolicy", &["P1"]).await;
    let policy = submit(&ledger, &contract, "issuePolicy", &["P1"]).await;
    assert_eq!(policy["status"], "ISSUED");

    let policies = query(&ledger, &contract, "getPolicies", &[]).await;
    assert_eq!(policies.as_array().unwrap().len(), 1);
    assert_eq!(policies[0]["Key"], "policy:P1");
}

#[tokio::test]
async fn test_policy_term_must_not_be_inverted() {
    let ledger = InMemoryLedger::new();
    let contract = VehicleContract::default();
    delivered_order(&ledger, &contract, "O1").await;
    submit(&ledger, &contract, "createVehicle", &["O1", "Tesla", "S", "black", "Alice"]).await;

    let err = contract
        .submit(
            &ledger,
            "requestPolicy",
            &args(&["P1", "O1-V1", "Insurer", "Alice", "FIRE_AND_THEFT", "2025-01-01", "2024-01-01"]),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_price_is_kept_private() {
    let ledger = InMemoryLedger::new();
    let contract = VehicleContract::default();

    let err = contract
        .submit(&ledger, "updatePriceDetails", &args(&["O1-V1", "100"]))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { .. }));

    delivered_order(&ledger, &contract, "O1").await;
    submit(&ledger, &contract, "createVehicle", &["O1", "Tesla", "S", "black", "Alice"]).await;
    submit(&ledger, &contract, "updatePriceDetails", &["O1-V1", "100"]).await;
    submit(&ledger, &contract, "updatePriceDetails", &["O1-V1", "250"]).await;

    let price = query(&ledger, &contract, "getPriceDetails", &["O1-V1"]).await;
    assert_eq!(price["amount"], 250);

    let state = ledger.state().await;
    assert!(state.public.keys().all(|key| !key.starts_with("price:")));
    assert!(state.get_private("collectionVehiclePriceDetails", "price:O1-V1").is_some());

    let err = contract
        .submit(&ledger, "updatePriceDetails", &args(&["O1-V1", "-5"]))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidArgument(_)));

    let err = contract
        .evaluate(&ledger, "getPriceDetails", &args(&["O2-V1"]))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { .. }));
}

#[tokio::test]
async fn test_init_ledger_seeds_sample_vehicles() {
    let ledger = InMemoryLedger::new();
    let contract = VehicleContract::default();

    let seeded = submit(&ledger, &contract, "initLedger", &[]).await;
    assert_eq!(seeded.as_array().unwrap().len(), 3);
    assert_eq!(query(&ledger, &contract, "getVehicleCount", &[]).await, 3);

    let all = query(&ledger, &contract, "queryAllVehicles", &[]).await;
    let keys: Vec<_> = all.as_array().unwrap().iter().map(|r| r["Key"].clone()).collect();
    assert_eq!(
        keys,
        vec![
            Value::from("vehicle:CD57271"),
            Value::from("vehicle:CD57291"),
            Value::from("vehicle:CD58911"),
        ]
    );

    let err = contract.submit(&ledger, "initLedger", &[]).await.unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyExists { .. }));
}

#[tokio::test]
async fn test_delete_vehicle() {
    let ledger = InMemoryLedger::new();
    let contract = VehicleContract::default();
    delivered_order(&ledger, &contract, "O1").await;
    submit(&ledger, &contract, "createVehicle", &["O1", "Tesla", "S", "black", "Alice"]).await;

    let submission = contract
        .submit(&ledger, "deleteVehicle", &args(&["O1-V1"]))
        .await
        .unwrap();
    assert!(submission.payload.is_empty());

    let err = contract
        .evaluate(&ledger, "queryVehicle", &args(&["O1-V1"]))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { .. }));

    let err = contract
        .submit(&ledger, "deleteVehicle", &args(&["O1-V1"]))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { .. }));
}
