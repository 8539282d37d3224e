//! Checkout Models

use camber::{discounts::DiscountDescriptor, pricing::PriceBreakdown};

use crate::domain::orders::models::{Address, OrderUuid, PaymentMethod, UserUuid};

/// The authenticated customer, as supplied by the external auth provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub uuid: UserUuid,
    pub email: String,
}

/// Everything checkout needs beyond the cart itself.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// Caller-generated idempotency key; generated before the first write when
    /// absent. A UI retry reusing the key is recognized, not duplicated.
    pub order_uuid: Option<OrderUuid>,
    /// `None` means the caller is not authenticated.
    pub user: Option<CurrentUser>,
    pub recipient: Option<Address>,
    pub payment_method: Option<PaymentMethod>,
    /// Flat shipping cost in minor units.
    pub shipping_cost: u64,
    /// The resolved discount for this attempt; immutable once resolved.
    pub discount: DiscountDescriptor,
}

/// A completed placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedOrder {
    pub order_uuid: OrderUuid,
    pub breakdown: PriceBreakdown,
    /// True when the order row already existed: this call was a retry of an
    /// attempt that had already gone through, and no write was repeated.
    pub retried: bool,
}

/// The saga's stages, in execution order. Used for log context; a failure
/// report names the stage it surfaced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStage {
    Validating,
    Creating,
    LinesWritten,
    StockAdjusted,
    CouponSettled,
    Complete,
}

impl CheckoutStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::Creating => "creating",
            Self::LinesWritten => "lines_written",
            Self::StockAdjusted => "stock_adjusted",
            Self::CouponSettled => "coupon_settled",
            Self::Complete => "complete",
        }
    }
}
