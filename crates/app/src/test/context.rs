//! Test context for service-level tests.

use std::sync::Arc;

use camber::{cart::CartProduct, discounts::DiscountEffect, discounts::OwnerReward};

use crate::{
    checkout::CheckoutService,
    domain::{
        catalog::{CatalogStore, CatalogStoreError, models::NewProduct, models::Product},
        coupons::{
            CouponResolver, CouponsStore, CouponsStoreError,
            models::{Coupon, CouponUuid, NewCoupon},
        },
        profiles::models::ProfileUuid,
    },
};

use super::memory::{
    InMemoryCatalogStore, InMemoryCouponsStore, InMemoryOrdersStore, InMemoryProfilesStore,
};

pub(crate) struct TestContext {
    pub catalog: Arc<InMemoryCatalogStore>,
    pub orders: Arc<InMemoryOrdersStore>,
    pub coupons: Arc<InMemoryCouponsStore>,
    pub profiles: Arc<InMemoryProfilesStore>,
    pub checkout: CheckoutService,
}

impl TestContext {
    pub(crate) fn new() -> Self {
        let catalog = Arc::new(InMemoryCatalogStore::default());
        let orders = Arc::new(InMemoryOrdersStore::default());
        let coupons = Arc::new(InMemoryCouponsStore::default());
        let profiles = Arc::new(InMemoryProfilesStore::default());

        let checkout = CheckoutService::new(
            catalog.clone(),
            orders.clone(),
            coupons.clone(),
            profiles.clone(),
        );

        Self {
            catalog,
            orders,
            coupons,
            profiles,
            checkout,
        }
    }

    pub(crate) fn resolver(&self) -> CouponResolver {
        CouponResolver::new(self.coupons.clone())
    }

    pub(crate) async fn seed_product(
        &self,
        name: &str,
        price: u64,
        stock: u32,
    ) -> Result<Product, CatalogStoreError> {
        self.catalog
            .create_product(NewProduct {
                uuid: crate::domain::catalog::models::ProductUuid::new(),
                name: name.to_string(),
                price,
                stock,
            })
            .await
    }

    pub(crate) async fn seed_coupon(
        &self,
        code: &str,
        effect: DiscountEffect,
        usage_limit: u32,
        owner: Option<OwnerReward>,
    ) -> Result<Coupon, CouponsStoreError> {
        self.coupons
            .create_coupon(NewCoupon {
                uuid: CouponUuid::new(),
                code: code.to_string(),
                effect,
                usage_limit,
                owner,
                expires_at: None,
            })
            .await
    }

    pub(crate) fn seed_profile(&self) -> ProfileUuid {
        self.profiles.seed()
    }

    /// The client-side snapshot a cart line is built from.
    pub(crate) fn snapshot(&self, product: &Product) -> CartProduct {
        CartProduct {
            uuid: product.uuid.into_uuid(),
            name: product.name.clone(),
            unit_price: product.price,
            stock: product.stock,
            active: product.active,
        }
    }
}
