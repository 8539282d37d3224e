//! Pricing
//!
//! The single source of checkout arithmetic. Both the cart summary shown while
//! shopping and the order orchestrator call [`quote`], so the two can never
//! disagree about a total.

use serde::{Deserialize, Serialize};

use crate::{cart::CartLine, discounts::DiscountDescriptor};

/// The priced result of a checkout attempt, in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Sum of `unit_price × quantity` over the lines.
    pub subtotal: u64,
    /// Flat shipping cost for the order.
    pub shipping_cost: u64,
    /// Discount taken off the subtotal, clamped to `[0, subtotal]`.
    pub discount_amount: u64,
    /// `subtotal + shipping_cost − discount_amount`; never below `shipping_cost`.
    pub total: u64,
}

/// Price a set of cart lines.
///
/// Pure and allocation-free; safe to call on every keystroke.
pub fn quote(
    lines: &[CartLine],
    shipping_cost: u64,
    discount: &DiscountDescriptor,
) -> PriceBreakdown {
    let subtotal: u64 = lines.iter().map(CartLine::line_total).sum();
    let discount_amount = discount.discount_amount(subtotal);

    PriceBreakdown {
        subtotal,
        shipping_cost,
        discount_amount,
        total: subtotal + shipping_cost - discount_amount,
    }
}
