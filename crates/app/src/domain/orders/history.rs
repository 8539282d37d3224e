//! Order History
//!
//! Read side for the account page, independent of the placement saga.

use std::sync::Arc;

use tracing::warn;

use crate::domain::orders::{
    errors::OrdersStoreError,
    models::{Order, OrderLine, UserUuid},
    store::OrdersStore,
};

/// An order joined with whatever lines could be fetched for it.
#[derive(Debug, Clone)]
pub struct OrderWithLines {
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

#[derive(Clone)]
pub struct OrderHistory {
    orders: Arc<dyn OrdersStore>,
}

impl OrderHistory {
    #[must_use]
    pub fn new(orders: Arc<dyn OrdersStore>) -> Self {
        Self { orders }
    }

    /// Every order the user owns, newest first, each with its lines.
    ///
    /// A failed line fetch degrades that order to an empty line list instead
    /// of failing the whole listing; the failure is logged.
    ///
    /// # Errors
    ///
    /// Returns an error only when the order listing itself cannot be read.
    #[tracing::instrument(name = "orders.history", skip(self), fields(user_uuid = %user))]
    pub async fn order_history(
        &self,
        user: UserUuid,
    ) -> Result<Vec<OrderWithLines>, OrdersStoreError> {
        let orders = self.orders.list_orders(user).await?;

        let mut history = Vec::with_capacity(orders.len());

        for order in orders {
            let lines = match self.orders.get_order_lines(order.uuid).await {
                Ok(lines) => lines,
                Err(error) => {
                    warn!(order_uuid = %order.uuid, %error, "order line fetch failed; listing order without lines");
                    Vec::new()
                }
            };

            history.push(OrderWithLines { order, lines });
        }

        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;

    use crate::domain::orders::{
        models::{Address, OrderLineUuid, OrderStatus, OrderUuid, PaymentMethod},
        store::MockOrdersStore,
    };

    use super::*;

    fn order(uuid: OrderUuid, user: UserUuid) -> Order {
        Order {
            uuid,
            user_uuid: user,
            status: OrderStatus::Pending,
            subtotal: 200_00,
            shipping_cost: 70_00,
            discount_amount: 0,
            total: 270_00,
            payment_method: PaymentMethod::Card,
            recipient: Address {
                recipient_name: "A. Driver".to_string(),
                recipient_phone: "555-0100".to_string(),
                shipping_address: "1 Main St".to_string(),
            },
            coupon_code: None,
            created_at: Timestamp::now(),
        }
    }

    fn line(order_uuid: OrderUuid) -> OrderLine {
        OrderLine {
            uuid: OrderLineUuid::new(),
            order_uuid,
            product_uuid: uuid::Uuid::now_v7(),
            product_name: "Brake rotor".to_string(),
            unit_price: 100_00,
            quantity: 2,
            created_at: Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn history_returns_orders_with_lines() -> TestResult {
        let user = UserUuid::new();
        let first = OrderUuid::new();
        let second = OrderUuid::new();

        let mut store = MockOrdersStore::new();

        let listed = vec![order(first, user), order(second, user)];
        store
            .expect_list_orders()
            .returning(move |_| Ok(listed.clone()));
        store
            .expect_get_order_lines()
            .returning(|order_uuid| Ok(vec![line(order_uuid)]));

        let history = OrderHistory::new(Arc::new(store))
            .order_history(user)
            .await?;

        assert_eq!(history.len(), 2);
        assert!(
            history.iter().all(|entry| entry.lines.len() == 1),
            "every order should carry its lines"
        );

        Ok(())
    }

    #[tokio::test]
    async fn line_fetch_failure_degrades_to_empty_lines() -> TestResult {
        let user = UserUuid::new();
        let healthy = OrderUuid::new();
        let broken = OrderUuid::new();

        let mut store = MockOrdersStore::new();

        let listed = vec![order(healthy, user), order(broken, user)];
        store
            .expect_list_orders()
            .returning(move |_| Ok(listed.clone()));
        store.expect_get_order_lines().returning(move |order_uuid| {
            if order_uuid == broken {
                Err(OrdersStoreError::Sql(sqlx::Error::PoolTimedOut))
            } else {
                Ok(vec![line(order_uuid)])
            }
        });

        let history = OrderHistory::new(Arc::new(store))
            .order_history(user)
            .await?;

        assert_eq!(history.len(), 2, "both orders must still be listed");

        let broken_entry = history
            .iter()
            .find(|entry| entry.order.uuid == broken)
            .ok_or("order with failed line fetch missing from history")?;

        assert!(
            broken_entry.lines.is_empty(),
            "failed line fetch should degrade to an empty line list"
        );

        Ok(())
    }
}
