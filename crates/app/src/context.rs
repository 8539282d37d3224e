//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    checkout::CheckoutService,
    database::{self, Db},
    domain::{
        catalog::{CatalogStore, PgCatalogStore},
        coupons::{CouponResolver, CouponsStore, PgCouponsStore},
        orders::{OrderHistory, OrdersStore, PgOrdersStore},
        profiles::{PgProfilesStore, ProfilesStore},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// The wired application services, one set per process.
#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn CatalogStore>,
    pub orders: Arc<dyn OrdersStore>,
    pub coupons: Arc<dyn CouponsStore>,
    pub profiles: Arc<dyn ProfilesStore>,
    pub checkout: CheckoutService,
    pub resolver: CouponResolver,
    pub history: OrderHistory,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(url: &str) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        let catalog: Arc<dyn CatalogStore> = Arc::new(PgCatalogStore::new(db.clone()));
        let orders: Arc<dyn OrdersStore> = Arc::new(PgOrdersStore::new(db.clone()));
        let coupons: Arc<dyn CouponsStore> = Arc::new(PgCouponsStore::new(db.clone()));
        let profiles: Arc<dyn ProfilesStore> = Arc::new(PgProfilesStore::new(db));

        Ok(Self {
            checkout: CheckoutService::new(
                catalog.clone(),
                orders.clone(),
                coupons.clone(),
                profiles.clone(),
            ),
            resolver: CouponResolver::new(coupons.clone()),
            history: OrderHistory::new(orders.clone()),
            catalog,
            orders,
            coupons,
            profiles,
        })
    }
}
