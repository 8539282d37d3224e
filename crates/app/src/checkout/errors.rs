//! Checkout errors.
//!
//! Three severities, matching what each stage has already written:
//!
//! - input and precondition errors occur before any write — the UI can show
//!   them directly and the customer can fix the cart and retry freely;
//! - fatal write errors mean the order may exist in a partially written state —
//!   they carry the generated order uuid so support can look the attempt up,
//!   and they are never silently retried;
//! - stock and coupon problems after the order exists are *warnings*, logged by
//!   the service and absent here, because the sale is already committed.

use thiserror::Error;

use crate::domain::{catalog::CatalogStoreError, orders::OrdersStoreError, orders::models::OrderUuid};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("no authenticated user")]
    NotAuthenticated,

    #[error("cart is empty")]
    EmptyCart,

    #[error("no shipping address provided")]
    MissingAddress,

    #[error("no payment method provided")]
    MissingPaymentMethod,

    /// The named product went inactive (or vanished) between cart assembly and
    /// checkout. Nothing was written.
    #[error("product {0:?} is no longer available")]
    ProductUnavailable(String),

    /// Validation could not re-read the catalog. Nothing was written.
    #[error("catalog unavailable")]
    CatalogUnavailable(#[source] CatalogStoreError),

    /// The order row write failed. The order may or may not exist; quote the
    /// uuid to support rather than retrying.
    #[error("order {order_uuid} could not be created; contact support")]
    OrderCreationFailed {
        order_uuid: OrderUuid,
        #[source]
        source: OrdersStoreError,
    },

    /// The order row exists but its lines do not — an operator-visible
    /// inconsistency. A blind retry would conflict on the existing row.
    #[error("order {order_uuid} was created but its lines were not; contact support")]
    OrderLinesCreationFailed {
        order_uuid: OrderUuid,
        #[source]
        source: OrdersStoreError,
    },
}
