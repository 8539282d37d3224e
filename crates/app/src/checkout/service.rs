//! Checkout service.
//!
//! One placement is one logical sequence of row writes, ordered so that the
//! expensive-to-undo effects come last:
//!
//! 1. validate (no writes) — 2. order row — 3. line batch — 4. conditional
//! stock decrements — 5. coupon settlement and owner credit.
//!
//! Steps 2–3 are fatal on failure; steps 4–5 are best-effort bookkeeping once
//! the sale is committed. The caller-generated order uuid makes the whole
//! sequence recognizable as a retry at step 2, where a duplicate key short
//! circuits every later write.

use std::sync::Arc;

use camber::{
    cart::CartStore,
    discounts::{CouponRef, OwnerReward},
    pricing::quote,
};
use tracing::{Span, info, warn};

use crate::{
    checkout::{
        errors::CheckoutError,
        models::{CheckoutRequest, CheckoutStage, PlacedOrder},
    },
    domain::{
        catalog::{CatalogStore, CatalogStoreError, models::StockAdjustment},
        coupons::{CouponsStore, models::CouponUuid, models::UsageIncrement},
        orders::{
            OrdersStore,
            models::{NewOrder, NewOrderLine, OrderInsert, OrderLineUuid, OrderUuid},
        },
        profiles::{ProfilesStore, models::ProfileUuid},
    },
};

/// How many compare-and-swap rounds coupon settlement attempts before giving
/// up. Each round re-reads the coupon first, so a retry is never blind.
const COUPON_SETTLE_ATTEMPTS: u32 = 3;

#[derive(Clone)]
pub struct CheckoutService {
    catalog: Arc<dyn CatalogStore>,
    orders: Arc<dyn OrdersStore>,
    coupons: Arc<dyn CouponsStore>,
    profiles: Arc<dyn ProfilesStore>,
}

impl CheckoutService {
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        orders: Arc<dyn OrdersStore>,
        coupons: Arc<dyn CouponsStore>,
        profiles: Arc<dyn ProfilesStore>,
    ) -> Self {
        Self {
            catalog,
            orders,
            coupons,
            profiles,
        }
    }

    /// Place the order described by `cart` and `request`.
    ///
    /// On success the cart is cleared; on any error it is left intact so the
    /// customer can retry without rebuilding it.
    ///
    /// # Errors
    ///
    /// Input and precondition failures ([`CheckoutError::NotAuthenticated`],
    /// [`CheckoutError::EmptyCart`], [`CheckoutError::MissingAddress`],
    /// [`CheckoutError::MissingPaymentMethod`],
    /// [`CheckoutError::ProductUnavailable`]) occur before any write. The
    /// fatal variants ([`CheckoutError::OrderCreationFailed`],
    /// [`CheckoutError::OrderLinesCreationFailed`]) mean the order may be
    /// partially persisted under the returned uuid.
    #[tracing::instrument(
        name = "checkout.place_order",
        skip(self, cart, request),
        fields(
            order_uuid = tracing::field::Empty,
            user_uuid = tracing::field::Empty,
            line_count = cart.len(),
        )
    )]
    pub async fn place_order(
        &self,
        cart: &mut CartStore,
        request: CheckoutRequest,
    ) -> Result<PlacedOrder, CheckoutError> {
        // Validating: the cheap, reversible half. No writes happen until every
        // precondition holds.
        let user = request.user.ok_or(CheckoutError::NotAuthenticated)?;

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let recipient = request.recipient.ok_or(CheckoutError::MissingAddress)?;
        let payment_method = request
            .payment_method
            .ok_or(CheckoutError::MissingPaymentMethod)?;

        Span::current().record("user_uuid", tracing::field::display(user.uuid));

        for line in cart.lines() {
            let product = match self.catalog.get_product(line.product.uuid.into()).await {
                Ok(product) => product,
                Err(CatalogStoreError::NotFound) => {
                    return Err(CheckoutError::ProductUnavailable(line.product.name.clone()));
                }
                Err(error) => return Err(CheckoutError::CatalogUnavailable(error)),
            };

            if !product.active {
                return Err(CheckoutError::ProductUnavailable(product.name));
            }
        }

        // Creating: price the attempt and write the order row. The uuid exists
        // before the write so a crash-and-retry reuses the same key.
        let breakdown = quote(cart.lines(), request.shipping_cost, &request.discount);
        let order_uuid = request.order_uuid.unwrap_or_else(OrderUuid::new);

        Span::current().record("order_uuid", tracing::field::display(order_uuid));

        let new_order = NewOrder {
            uuid: order_uuid,
            user_uuid: user.uuid,
            subtotal: breakdown.subtotal,
            shipping_cost: breakdown.shipping_cost,
            discount_amount: breakdown.discount_amount,
            total: breakdown.total,
            payment_method,
            recipient,
            coupon_code: request
                .discount
                .coupon
                .as_ref()
                .map(|coupon| coupon.code.clone()),
        };

        match self.orders.insert_order(new_order).await {
            Ok(OrderInsert::Created) => {}
            Ok(OrderInsert::AlreadyExists) => {
                // A retry of an attempt that already went through: skip every
                // remaining write rather than re-applying decrements.
                info!(%order_uuid, "order already placed; treating call as a retry");

                cart.clear();

                return Ok(PlacedOrder {
                    order_uuid,
                    breakdown,
                    retried: true,
                });
            }
            Err(source) => {
                return Err(CheckoutError::OrderCreationFailed { order_uuid, source });
            }
        }

        // LinesWritten: the one failure mode that leaves a visibly half-built
        // order, surfaced as fatal instead of silently retried.
        let lines: Vec<NewOrderLine> = cart
            .lines()
            .iter()
            .map(|line| NewOrderLine {
                uuid: OrderLineUuid::new(),
                product_uuid: line.product.uuid,
                product_name: line.product.name.clone(),
                unit_price: line.product.unit_price,
                quantity: line.quantity,
            })
            .collect();

        if let Err(source) = self.orders.insert_lines(order_uuid, &lines).await {
            return Err(CheckoutError::OrderLinesCreationFailed { order_uuid, source });
        }

        // StockAdjusted: conditional per-line decrements. Losing a race here
        // cannot oversell (the condition is in the write) and does not unwind
        // the order; a storage failure is success-with-uncertainty, never
        // retried, because the decrement is not idempotent.
        for line in cart.lines() {
            match self
                .catalog
                .decrement_stock(line.product.uuid.into(), line.quantity)
                .await
            {
                Ok(StockAdjustment::Adjusted) => {}
                Ok(StockAdjustment::InsufficientStock) => {
                    warn!(
                        stage = CheckoutStage::StockAdjusted.as_str(),
                        %order_uuid,
                        product_uuid = %line.product.uuid,
                        quantity = line.quantity,
                        "stock decrement lost to a concurrent buyer; order stands"
                    );
                }
                Err(error) => {
                    warn!(
                        stage = CheckoutStage::StockAdjusted.as_str(),
                        %order_uuid,
                        product_uuid = %line.product.uuid,
                        %error,
                        "stock decrement outcome uncertain; not retrying"
                    );
                }
            }
        }

        // CouponSettled: best-effort side ledger.
        if let Some(coupon) = &request.discount.coupon {
            self.settle_coupon(
                order_uuid,
                coupon,
                breakdown.subtotal,
                request.discount.owner,
            )
            .await;
        }

        // Complete: the only path that clears the cart.
        cart.clear();

        info!(
            stage = CheckoutStage::Complete.as_str(),
            %order_uuid,
            total = breakdown.total,
            "order placed"
        );

        Ok(PlacedOrder {
            order_uuid,
            breakdown,
            retried: false,
        })
    }

    /// Increment the coupon's usage count and credit its owner.
    ///
    /// Every failure here is a warning: the order is already paid for, and the
    /// coupon ledger must never block the customer.
    async fn settle_coupon(
        &self,
        order_uuid: OrderUuid,
        coupon: &CouponRef,
        subtotal: u64,
        owner: Option<OwnerReward>,
    ) {
        let stage = CheckoutStage::CouponSettled.as_str();
        let coupon_uuid = CouponUuid::from_uuid(coupon.uuid);

        for _attempt in 0..COUPON_SETTLE_ATTEMPTS {
            let current = match self.coupons.get_coupon(coupon_uuid).await {
                Ok(current) => current,
                Err(error) => {
                    warn!(stage, %order_uuid, %coupon_uuid, %error, "coupon read failed; skipping settlement");
                    return;
                }
            };

            if current.usage_exhausted() {
                warn!(stage, %order_uuid, %coupon_uuid, "usage limit reached before settlement; not incrementing");
                return;
            }

            match self
                .coupons
                .increment_usage(coupon_uuid, current.times_used)
                .await
            {
                Ok(UsageIncrement::Applied) => {
                    self.credit_owner(order_uuid, subtotal, owner).await;
                    return;
                }
                Ok(UsageIncrement::Conflict) => {
                    // Lost to a concurrent redemption; re-read and try again.
                    continue;
                }
                Err(error) => {
                    warn!(stage, %order_uuid, %coupon_uuid, %error, "usage increment outcome uncertain; not retrying");
                    return;
                }
            }
        }

        warn!(stage, %order_uuid, %coupon_uuid, attempts = COUPON_SETTLE_ATTEMPTS, "gave up settling coupon usage after repeated conflicts");
    }

    async fn credit_owner(&self, order_uuid: OrderUuid, subtotal: u64, owner: Option<OwnerReward>) {
        let Some(owner) = owner else { return };

        let amount = owner.reward_amount(subtotal);

        if amount == 0 {
            return;
        }

        let owner_uuid = ProfileUuid::from_uuid(owner.owner_uuid);

        if let Err(error) = self.profiles.increment_credit(owner_uuid, amount).await {
            warn!(
                stage = CheckoutStage::CouponSettled.as_str(),
                %order_uuid,
                %owner_uuid,
                amount,
                %error,
                "owner credit increment failed; order stands"
            );
        }
    }
}
