use crate::context::InvocationContext;
use crate::contract::{Args, ContractService, json_payload};
use crate::core::{LedgerError, Result};
use crate::model::Price;
use async_trait::async_trait;

/// Vehicle prices, visible only to members of the private price collection.
pub struct PriceService;

impl PriceService {
    /// Insert or replace the price of an existing vehicle
    pub async fn update_price_details(
        ctx: &InvocationContext<'_>,
        vehicle_id: &str,
        amount: u64,
    ) -> Result<Price> {
        ctx.vehicle_list().get_vehicle(vehicle_id).await?;

        let price = Price::new(vehicle_id, amount);
        ctx.price_list().upsert(&price).await?;
        Ok(price)
    }

    pub async fn get_price_details(ctx: &InvocationContext<'_>, vehicle_id: &str) -> Result<Price> {
        ctx.price_list().get(vehicle_id).await
    }
}

#[async_trait]
impl ContractService for PriceService {
    fn name(&self) -> &'static str {
        "price"
    }

    fn transactions(&self) -> &'static [&'static str] {
        &["updatePriceDetails", "getPriceDetails"]
    }

    async fn invoke(&self, ctx: &InvocationContext<'_>, args: Args<'_>) -> Result<Vec<u8>> {
        match ctx.function() {
            "updatePriceDetails" => {
                args.expect(2)?;
                let price = Self::update_price_details(
                    ctx,
                    args.get(0, "vehicleId")?,
                    args.amount(1, "price")?,
                )
                .await?;
                json_payload(&price)
            }
            "getPriceDetails" => {
                args.expect(1)?;
                json_payload(&Self::get_price_details(ctx, args.get(0, "vehicleId")?).await?)
            }
            other => Err(LedgerError::UnknownTransaction(other.to_string())),
        }
    }
}
