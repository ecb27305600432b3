use super::ORDER_EVENT;
use crate::collection::QueryRecord;
use crate::context::InvocationContext;
use crate::contract::{Args, ContractService, json_payload};
use crate::core::{LedgerError, Result};
use crate::model::{Order, OrderStatus, VehicleDetails};
use async_trait::async_trait;

pub struct OrderService;

impl OrderService {
    pub async fn place_order(
        ctx: &InvocationContext<'_>,
        order_id: &str,
        owner: &str,
        make: &str,
        model: &str,
        color: &str,
    ) -> Result<Order> {
        let details = VehicleDetails::new(order_id, owner, make, model, color);
        let order = Order::new(order_id, owner, details);
        ctx.order_list().add(&order).await?;

        ctx.emit(ORDER_EVENT, &order)?;
        Ok(order)
    }

    pub async fn get_order(ctx: &InvocationContext<'_>, order_id: &str) -> Result<Order> {
        ctx.order_list().get_order(order_id).await
    }

    pub async fn get_orders(ctx: &InvocationContext<'_>) -> Result<Vec<QueryRecord<Order>>> {
        ctx.order_list().get_all().await
    }

    pub async fn get_orders_by_status(
        ctx: &InvocationContext<'_>,
        status: OrderStatus,
    ) -> Result<Vec<Order>> {
        Ok(ctx
            .order_list()
            .get_all()
            .await?
            .into_iter()
            .filter_map(QueryRecord::into_entity)
            .filter(|order| order.is_status(status))
            .collect())
    }

    /// Move an order to `target`. Any status other than the current one is accepted.
    pub async fn update_status(
        ctx: &InvocationContext<'_>,
        order_id: &str,
        target: OrderStatus,
    ) -> Result<Order> {
        let list = ctx.order_list();
        let mut order = list.get_order(order_id).await?;
        order.set_status(target)?;
        list.update_order(&order).await?;
        Ok(order)
    }
}

#[async_trait]
impl ContractService for OrderService {
    fn name(&self) -> &'static str {
        "order"
    }

    fn transactions(&self) -> &'static [&'static str] {
        &[
            "placeOrder",
            "getOrder",
            "getOrders",
            "getOrdersByStatus",
            "updateOrderStatusInProgress",
            "updateOrderStatusPending",
            "updateOrderDelivered",
        ]
    }

    async fn invoke(&self, ctx: &InvocationContext<'_>, args: Args<'_>) -> Result<Vec<u8>> {
        match ctx.function() {
            "placeOrder" => {
                args.expect(5)?;
                let order = Self::place_order(
                    ctx,
                    args.get(0, "orderId")?,
                    args.get(1, "owner")?,
                    args.get(2, "make")?,
                    args.get(3, "model")?,
                    args.get(4, "color")?,
                )
                .await?;
                json_payload(&order)
            }
            "getOrder" => {
                args.expect(1)?;
                json_payload(&Self::get_order(ctx, args.get(0, "orderId")?).await?)
            }
            "getOrders" => {
                args.expect(0)?;
                json_payload(&Self::get_orders(ctx).await?)
            }
            "getOrdersByStatus" => {
                args.expect(1)?;
                let status = args.parse::<OrderStatus>(0, "orderStatus")?;
                json_payload(&Self::get_orders_by_status(ctx, status).await?)
            }
            "updateOrderStatusInProgress" => {
                args.expect(1)?;
                let order =
                    Self::update_status(ctx, args.get(0, "orderId")?, OrderStatus::InProgress)
                        .await?;
                json_payload(&order)
            }
            "updateOrderStatusPending" => {
                args.expect(1)?;
                let order =
                    Self::update_status(ctx, args.get(0, "orderId")?, OrderStatus::Pending).await?;
                json_payload(&order)
            }
            "updateOrderDelivered" => {
                // Older clients also pass a vehicle number; it is ignored.
                args.expect_range(1, 2)?;
                let order =
                    Self::update_status(ctx, args.get(0, "orderId")?, OrderStatus::Delivered)
                        .await?;
                json_payload(&order)
            }
            other => Err(LedgerError::UnknownTransaction(other.to_string())),
        }
    }
}
