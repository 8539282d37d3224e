//! Coupon Resolver
//!
//! Translates a user-entered code into a [`DiscountDescriptor`] or a typed
//! rejection. Resolution never mutates the coupon: `times_used` moves only at
//! settlement, when an order is actually placed, so re-resolving the same code
//! is always side-effect free.

use std::sync::Arc;

use camber::discounts::{CouponRef, DiscountDescriptor, DiscountEffect};
use jiff::Timestamp;
use thiserror::Error;
use tracing::info;

use crate::domain::{
    coupons::{errors::CouponsStoreError, models::Coupon, store::CouponsStore},
    orders::models::OrderUuid,
};

/// Why a code did not resolve to a discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponRejection {
    /// No coupon carries this code.
    NotFound,
    /// The coupon was deactivated.
    Inactive,
    /// The coupon's expiry date has passed.
    Expired,
    /// Every permitted redemption has been used.
    UsageLimitReached,
}

#[derive(Debug, Error)]
pub enum CouponResolveError {
    #[error("coupon rejected: {0:?}")]
    Rejected(CouponRejection),

    #[error(transparent)]
    Store(#[from] CouponsStoreError),
}

/// A successful resolution: the immutable descriptor for this checkout attempt
/// plus a human-readable confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCoupon {
    pub descriptor: DiscountDescriptor,
    pub message: String,
}

#[derive(Clone)]
pub struct CouponResolver {
    coupons: Arc<dyn CouponsStore>,
}

impl CouponResolver {
    #[must_use]
    pub fn new(coupons: Arc<dyn CouponsStore>) -> Self {
        Self { coupons }
    }

    /// Resolve a code against the server-side rules.
    ///
    /// `order` is purely contextual; it may be absent before the order exists.
    ///
    /// # Errors
    ///
    /// Returns [`CouponResolveError::Rejected`] with the reason when the code
    /// fails validation, or [`CouponResolveError::Store`] on a storage failure.
    #[tracing::instrument(name = "coupons.resolve", skip(self), fields(order_uuid = ?order))]
    pub async fn resolve(
        &self,
        code: &str,
        order: Option<OrderUuid>,
    ) -> Result<ResolvedCoupon, CouponResolveError> {
        let coupon = self
            .coupons
            .find_by_code(code)
            .await?
            .ok_or(CouponResolveError::Rejected(CouponRejection::NotFound))?;

        if !coupon.active {
            return Err(CouponResolveError::Rejected(CouponRejection::Inactive));
        }

        if coupon.expired_at(Timestamp::now()) {
            return Err(CouponResolveError::Rejected(CouponRejection::Expired));
        }

        if coupon.usage_exhausted() {
            return Err(CouponResolveError::Rejected(
                CouponRejection::UsageLimitReached,
            ));
        }

        info!(coupon_uuid = %coupon.uuid, "resolved coupon code");

        Ok(resolved(&coupon))
    }
}

fn resolved(coupon: &Coupon) -> ResolvedCoupon {
    let message = match coupon.effect {
        Some(DiscountEffect::Percentage(percentage)) => {
            format!("Coupon {} applied: {percentage}% off", coupon.code)
        }
        Some(DiscountEffect::Fixed(amount)) => {
            format!("Coupon {} applied: {amount} minor units off", coupon.code)
        }
        None => format!("Coupon {} applied", coupon.code),
    };

    ResolvedCoupon {
        descriptor: DiscountDescriptor {
            effect: coupon.effect,
            coupon: Some(CouponRef {
                uuid: coupon.uuid.into_uuid(),
                code: coupon.code.clone(),
            }),
            owner: coupon.owner,
        },
        message,
    }
}

#[cfg(test)]
mod tests {
    use jiff::{Span, Timestamp};
    use rust_decimal::dec;
    use testresult::TestResult;

    use crate::domain::coupons::{models::CouponUuid, store::MockCouponsStore};

    use super::*;

    fn coupon(code: &str) -> Coupon {
        Coupon {
            uuid: CouponUuid::new(),
            code: code.to_string(),
            effect: Some(DiscountEffect::Percentage(dec!(10))),
            usage_limit: 0,
            times_used: 0,
            owner: None,
            active: true,
            expires_at: None,
            created_at: Timestamp::now(),
        }
    }

    fn resolver_with(coupon: Option<Coupon>) -> CouponResolver {
        let mut store = MockCouponsStore::new();

        store
            .expect_find_by_code()
            .returning(move |_| Ok(coupon.clone()));

        CouponResolver::new(Arc::new(store))
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let resolver = resolver_with(None);

        let result = resolver.resolve("NOPE", None).await;

        assert!(
            matches!(
                result,
                Err(CouponResolveError::Rejected(CouponRejection::NotFound))
            ),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn inactive_coupon_is_rejected() {
        let mut inactive = coupon("SAVE10");
        inactive.active = false;

        let result = resolver_with(Some(inactive)).resolve("SAVE10", None).await;

        assert!(
            matches!(
                result,
                Err(CouponResolveError::Rejected(CouponRejection::Inactive))
            ),
            "expected Inactive, got {result:?}"
        );
    }

    #[tokio::test]
    async fn expired_coupon_is_rejected() -> TestResult {
        let mut expired = coupon("SAVE10");
        expired.expires_at = Some(Timestamp::now() - Span::new().hours(1));

        let result = resolver_with(Some(expired)).resolve("SAVE10", None).await;

        assert!(
            matches!(
                result,
                Err(CouponResolveError::Rejected(CouponRejection::Expired))
            ),
            "expected Expired, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn exhausted_coupon_is_rejected() {
        let mut exhausted = coupon("SAVE10");
        exhausted.usage_limit = 3;
        exhausted.times_used = 3;

        let result = resolver_with(Some(exhausted)).resolve("SAVE10", None).await;

        assert!(
            matches!(
                result,
                Err(CouponResolveError::Rejected(
                    CouponRejection::UsageLimitReached
                ))
            ),
            "expected UsageLimitReached, got {result:?}"
        );
    }

    #[tokio::test]
    async fn valid_code_resolves_to_descriptor() -> TestResult {
        let valid = coupon("SAVE10");
        let uuid = valid.uuid;

        let resolved = resolver_with(Some(valid)).resolve("SAVE10", None).await?;

        assert_eq!(
            resolved.descriptor.effect,
            Some(DiscountEffect::Percentage(dec!(10)))
        );
        assert_eq!(
            resolved.descriptor.coupon.as_ref().map(|c| c.uuid),
            Some(uuid.into_uuid())
        );
        assert!(
            resolved.message.contains("SAVE10"),
            "confirmation should name the code"
        );

        Ok(())
    }

    #[tokio::test]
    async fn resolving_twice_is_idempotent() -> TestResult {
        let resolver = resolver_with(Some(coupon("SAVE10")));

        let first = resolver.resolve("SAVE10", None).await?;
        let second = resolver.resolve("SAVE10", None).await?;

        assert_eq!(
            first.descriptor, second.descriptor,
            "re-resolving must not change the descriptor"
        );

        Ok(())
    }
}
