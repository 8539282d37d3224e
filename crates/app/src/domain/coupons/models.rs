//! Coupon Models

use camber::discounts::{DiscountEffect, OwnerReward};
use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Coupon UUID
pub type CouponUuid = TypedUuid<Coupon>;

/// Coupon Model
#[derive(Debug, Clone)]
pub struct Coupon {
    pub uuid: CouponUuid,
    pub code: String,
    /// How redemption reduces the order subtotal.
    pub effect: Option<DiscountEffect>,
    /// Maximum redemptions; `0` means unlimited.
    pub usage_limit: u32,
    pub times_used: u32,
    /// Reward for the coupon's creator, when it has one.
    pub owner: Option<OwnerReward>,
    pub active: bool,
    pub expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl Coupon {
    /// Whether the usage limit leaves no redemptions.
    pub fn usage_exhausted(&self) -> bool {
        self.usage_limit > 0 && self.times_used >= self.usage_limit
    }

    /// Whether the coupon expired before `now`.
    pub fn expired_at(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at < now)
    }
}

/// New Coupon Model
#[derive(Debug, Clone)]
pub struct NewCoupon {
    pub uuid: CouponUuid,
    pub code: String,
    pub effect: DiscountEffect,
    pub usage_limit: u32,
    pub owner: Option<OwnerReward>,
    pub expires_at: Option<Timestamp>,
}

/// Outcome of a conditional usage increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageIncrement {
    /// The increment applied against the expected usage count.
    Applied,
    /// `times_used` moved since it was read; nothing was written.
    Conflict,
}
