//! Discounts
//!
//! A [`DiscountDescriptor`] is the resolved effect of a coupon for one checkout
//! attempt. It is produced server-side by the coupon resolver and is immutable
//! from then on; redeeming the coupon (usage count, owner credit) happens only
//! when an order is actually placed.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a discount reduces the order subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscountEffect {
    /// Reduce the subtotal by this percentage.
    Percentage(Decimal),
    /// Reduce the subtotal by a fixed amount of minor units.
    Fixed(u64),
}

/// The reward granted to a coupon's owner per successful redemption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OwnerBenefit {
    /// A fixed amount of minor units.
    Amount(u64),
    /// A percentage of the order subtotal.
    Percentage(Decimal),
}

/// The coupon a descriptor was resolved from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponRef {
    /// Coupon row id; settlement is keyed on this.
    pub uuid: Uuid,
    /// The code the customer entered, snapshotted onto the order.
    pub code: String,
}

/// The owner-side reward attached to a resolved coupon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerReward {
    /// Profile that earns credit on redemption.
    pub owner_uuid: Uuid,
    /// Credit granted per redemption.
    pub benefit: OwnerBenefit,
}

impl OwnerReward {
    /// Credit earned for an order with the given subtotal, in minor units.
    pub fn reward_amount(&self, subtotal: u64) -> u64 {
        match self.benefit {
            OwnerBenefit::Amount(amount) => amount,
            OwnerBenefit::Percentage(percentage) => percentage_of(subtotal, percentage),
        }
    }
}

/// The resolved effect of a coupon or promotion on one checkout attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountDescriptor {
    /// How the subtotal is reduced; `None` means no discount.
    pub effect: Option<DiscountEffect>,
    /// The coupon this was resolved from, when any.
    pub coupon: Option<CouponRef>,
    /// Reward for the coupon's owner, when the coupon has one.
    pub owner: Option<OwnerReward>,
}

impl DiscountDescriptor {
    /// The no-discount descriptor.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Amount taken off the subtotal, in minor units.
    ///
    /// Percentages are rounded half away from zero to whole minor units. The
    /// result is clamped to `[0, subtotal]` so a discount can never exceed
    /// what it discounts.
    pub fn discount_amount(&self, subtotal: u64) -> u64 {
        let raw = match self.effect {
            None => 0,
            Some(DiscountEffect::Fixed(amount)) => amount,
            Some(DiscountEffect::Percentage(percentage)) => percentage_of(subtotal, percentage),
        };

        raw.min(subtotal)
    }
}

/// `percentage` percent of `amount` in minor units, rounded half away from zero.
///
/// Negative or non-representable results collapse to zero; the descriptor is
/// server-produced, so these only arise from corrupt data.
fn percentage_of(amount: u64, percentage: Decimal) -> u64 {
    let exact = Decimal::from(amount) * percentage / Decimal::ONE_HUNDRED;

    exact
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use super::*;

    fn percentage(value: Decimal) -> DiscountDescriptor {
        DiscountDescriptor {
            effect: Some(DiscountEffect::Percentage(value)),
            ..DiscountDescriptor::default()
        }
    }

    #[test]
    fn no_discount_is_zero() {
        assert_eq!(DiscountDescriptor::none().discount_amount(200_00), 0);
    }

    #[test]
    fn percentage_of_subtotal() {
        assert_eq!(percentage(dec!(10)).discount_amount(200_00), 20_00);
    }

    #[test]
    fn percentage_rounds_half_away_from_zero() {
        // 2.5% of 101 minor units = 2.525, rounds to 3.
        assert_eq!(percentage(dec!(2.5)).discount_amount(101), 3);
    }

    #[test]
    fn fixed_amount_is_taken_verbatim() {
        let descriptor = DiscountDescriptor {
            effect: Some(DiscountEffect::Fixed(15_00)),
            ..DiscountDescriptor::default()
        };

        assert_eq!(descriptor.discount_amount(200_00), 15_00);
    }

    #[test]
    fn percentage_above_hundred_clamps_to_subtotal() {
        assert_eq!(percentage(dec!(150)).discount_amount(200_00), 200_00);
    }

    #[test]
    fn fixed_above_subtotal_clamps_to_subtotal() {
        let descriptor = DiscountDescriptor {
            effect: Some(DiscountEffect::Fixed(500_00)),
            ..DiscountDescriptor::default()
        };

        assert_eq!(descriptor.discount_amount(200_00), 200_00);
    }

    #[test]
    fn negative_percentage_collapses_to_zero() {
        assert_eq!(percentage(dec!(-10)).discount_amount(200_00), 0);
    }

    #[test]
    fn owner_reward_amount() {
        let owner_uuid = Uuid::now_v7();

        let fixed = OwnerReward {
            owner_uuid,
            benefit: OwnerBenefit::Amount(5_00),
        };
        let percent = OwnerReward {
            owner_uuid,
            benefit: OwnerBenefit::Percentage(dec!(5)),
        };

        assert_eq!(fixed.reward_amount(200_00), 5_00);
        assert_eq!(percent.reward_amount(200_00), 10_00);
    }
}
