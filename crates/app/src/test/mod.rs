//! Test support: in-memory stores with the same conditional-write semantics as
//! the Postgres implementations, plus a context wiring them to the services.

mod context;

pub(crate) use context::TestContext;

mod end_to_end {
    use camber::{cart::CartStore, discounts::DiscountEffect};
    use rust_decimal::dec;
    use testresult::TestResult;

    use crate::{
        checkout::models::{CheckoutRequest, CurrentUser},
        domain::orders::{
            OrderHistory,
            models::{Address, PaymentMethod, UserUuid},
        },
    };

    use super::TestContext;

    #[tokio::test]
    async fn resolve_place_and_list_history() -> TestResult {
        let ctx = TestContext::new();
        let user = UserUuid::new();

        let rotor = ctx.seed_product("Brake rotor", 100_00, 5).await?;
        ctx.seed_coupon("SAVE10", DiscountEffect::Percentage(dec!(10)), 0, None)
            .await?;

        let resolved = ctx.resolver().resolve("SAVE10", None).await?;

        let mut cart = CartStore::new();
        cart.add(ctx.snapshot(&rotor))?;
        cart.set_quantity(rotor.uuid.into_uuid(), 2)?;

        let placed = ctx
            .checkout
            .place_order(
                &mut cart,
                CheckoutRequest {
                    order_uuid: None,
                    user: Some(CurrentUser {
                        uuid: user,
                        email: "driver@example.com".to_string(),
                    }),
                    recipient: Some(Address {
                        recipient_name: "A. Driver".to_string(),
                        recipient_phone: "555-0100".to_string(),
                        shipping_address: "1 Main St".to_string(),
                    }),
                    payment_method: Some(PaymentMethod::Card),
                    shipping_cost: 70_00,
                    discount: resolved.descriptor,
                },
            )
            .await?;

        assert_eq!(placed.breakdown.total, 250_00);

        let history = OrderHistory::new(ctx.orders.clone())
            .order_history(user)
            .await?;

        assert_eq!(history.len(), 1);

        let entry = history.first().ok_or("placed order missing from history")?;

        assert_eq!(entry.order.uuid, placed.order_uuid);
        assert_eq!(entry.order.coupon_code.as_deref(), Some("SAVE10"));
        assert_eq!(entry.lines.len(), 1);

        Ok(())
    }
}
