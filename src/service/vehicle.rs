use super::{REQUEST_VIN, VIN_ISSUED};
use crate::collection::{QueryRecord, VehicleList};
use crate::context::InvocationContext;
use crate::contract::{Args, ContractService, json_payload};
use crate::core::{LedgerError, Result, validate_id};
use crate::model::{OrderStatus, Vehicle};
use async_trait::async_trait;

pub struct VehicleService;

impl VehicleService {
    /// Sample vehicles written at instantiation
    pub async fn init_ledger(ctx: &InvocationContext<'_>) -> Result<Vec<Vehicle>> {
        let vehicles = vec![
            Vehicle::new("CD58911", "4567788", "Tomoko", "Toyota", "Prius", "blue"),
            Vehicle::new("CD57271", "1230819", "Jin Soo", "Hyundai", "Tucson", "green"),
            Vehicle::new("CD57291", "3456777", "Max", "Volkswagen", "Passat", "red"),
        ];

        let list = ctx.vehicle_list();
        for vehicle in &vehicles {
            list.add(vehicle).await?;
            log::info!("seeded vehicle '{}'", vehicle.id);
        }
        Ok(vehicles)
    }

    /// Build a vehicle from a DELIVERED order. The vehicle id is derived from the
    /// order id, so one order may produce several vehicles.
    pub async fn create_vehicle(
        ctx: &InvocationContext<'_>,
        order_id: &str,
        make: &str,
        model: &str,
        color: &str,
        owner: &str,
    ) -> Result<Vehicle> {
        let orders = ctx.order_list();
        if !orders.exists(order_id).await? {
            return Err(LedgerError::PreconditionFailed(format!(
                "order '{}' doesn't exist",
                order_id
            )));
        }

        let order = orders.get_order(order_id).await?;
        if order.order_status != OrderStatus::Delivered {
            return Err(LedgerError::PreconditionFailed(format!(
                "order '{}' must be DELIVERED to create a vehicle, but is {}",
                order_id, order.order_status
            )));
        }

        let vehicles = ctx.vehicle_list();
        let id = Self::next_vehicle_id(&vehicles, order_id).await?;
        let vehicle = Vehicle::new(&id, order_id, owner, make, model, color);
        vehicles.add(&vehicle).await?;
        Ok(vehicle)
    }

    /// First `<order>-V<n>` slot with nothing stored under it. Undecodable records
    /// still occupy their slot.
    async fn next_vehicle_id(vehicles: &VehicleList<'_>, order_id: &str) -> Result<String> {
        let mut sequence = 1u32;
        loop {
            let id = format!("{}-V{}", order_id, sequence);
            if !vehicles.contains_key(&id).await? {
                return Ok(id);
            }
            sequence = sequence.checked_add(1).ok_or_else(|| {
                LedgerError::PreconditionFailed(format!(
                    "order '{}' has no free vehicle id left",
                    order_id
                ))
            })?;
        }
    }

    pub async fn query_vehicle(ctx: &InvocationContext<'_>, id: &str) -> Result<Vehicle> {
        ctx.vehicle_list().get_vehicle(id).await
    }

    pub async fn query_all_vehicles(ctx: &InvocationContext<'_>) -> Result<Vec<QueryRecord<Vehicle>>> {
        ctx.vehicle_list().get_all().await
    }

    pub async fn vehicle_count(ctx: &InvocationContext<'_>) -> Result<usize> {
        ctx.vehicle_list().count().await
    }

    pub async fn request_vehicle_vin(ctx: &InvocationContext<'_>, id: &str) -> Result<Vehicle> {
        let list = ctx.vehicle_list();
        let mut vehicle = list.get_vehicle(id).await?;
        vehicle.request_vin()?;
        list.update_vehicle(&vehicle).await?;

        ctx.emit(REQUEST_VIN, &vehicle)?;
        Ok(vehicle)
    }

    pub async fn issue_vehicle_vin(ctx: &InvocationContext<'_>, id: &str, vin: &str) -> Result<Vehicle> {
        validate_id("vin", vin)?;

        let list = ctx.vehicle_list();
        let mut vehicle = list.get_vehicle(id).await?;
        vehicle.issue_vin(vin)?;
        list.update_vehicle(&vehicle).await?;

        ctx.emit(VIN_ISSUED, &vehicle)?;
        Ok(vehicle)
    }

    pub async fn change_vehicle_owner(
        ctx: &InvocationContext<'_>,
        id: &str,
        new_owner: &str,
    ) -> Result<Vehicle> {
        let list = ctx.vehicle_list();
        let mut vehicle = list.get_vehicle(id).await?;
        vehicle.owner = new_owner.to_string();
        list.update_vehicle(&vehicle).await?;
        Ok(vehicle)
    }

    /// Removes whatever is stored under the vehicle key, including records that no
    /// longer decode
    pub async fn delete_vehicle(ctx: &InvocationContext<'_>, id: &str) -> Result<()> {
        let list = ctx.vehicle_list();
        if !list.contains_key(id).await? {
            return Err(LedgerError::not_found("Vehicle", id));
        }
        list.delete(id).await
    }
}

#[async_trait]
impl ContractService for VehicleService {
    fn name(&self) -> &'static str {
        "vehicle"
    }

    fn transactions(&self) -> &'static [&'static str] {
        &[
            "initLedger",
            "createVehicle",
            "queryVehicle",
            "queryAllVehicles",
            "getVehicleCount",
            "requestVehicleVIN",
            "issueVehicleVIN",
            "changeVehicleOwner",
            "deleteVehicle",
        ]
    }

    async fn invoke(&self, ctx: &InvocationContext<'_>, args: Args<'_>) -> Result<Vec<u8>> {
        match ctx.function() {
            "initLedger" => {
                args.expect(0)?;
                json_payload(&Self::init_ledger(ctx).await?)
            }
            "createVehicle" => {
                args.expect(5)?;
                let vehicle = Self::create_vehicle(
                    ctx,
                    args.get(0, "orderId")?,
                    args.get(1, "make")?,
                    args.get(2, "model")?,
                    args.get(3, "color")?,
                    args.get(4, "owner")?,
                )
                .await?;
                json_payload(&vehicle)
            }
            "queryVehicle" => {
                args.expect(1)?;
                json_payload(&Self::query_vehicle(ctx, args.get(0, "vehicleId")?).await?)
            }
            "queryAllVehicles" => {
                args.expect(0)?;
                json_payload(&Self::query_all_vehicles(ctx).await?)
            }
            "getVehicleCount" => {
                args.expect(0)?;
                json_payload(&Self::vehicle_count(ctx).await?)
            }
            "requestVehicleVIN" => {
                args.expect(1)?;
                json_payload(&Self::request_vehicle_vin(ctx, args.get(0, "vehicleId")?).await?)
            }
            "issueVehicleVIN" => {
                args.expect(2)?;
                let vehicle =
                    Self::issue_vehicle_vin(ctx, args.get(0, "vehicleId")?, args.get(1, "vin")?)
                        .await?;
                json_payload(&vehicle)
            }
            "changeVehicleOwner" => {
                args.expect(2)?;
                let vehicle = Self::change_vehicle_owner(
                    ctx,
                    args.get(0, "vehicleId")?,
                    args.get(1, "newOwner")?,
                )
                .await?;
                json_payload(&vehicle)
            }
            "deleteVehicle" => {
                args.expect(1)?;
                Self::delete_vehicle(ctx, args.get(0, "vehicleId")?).await?;
                Ok(Vec::new())
            }
            other => Err(LedgerError::UnknownTransaction(other.to_string())),
        }
    }
}
