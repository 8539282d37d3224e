//! Cart

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The requested quantity exceeds the product's last-known stock.
    #[error("requested quantity {requested} exceeds available stock {available}")]
    InsufficientStock {
        /// Quantity the mutation would have produced.
        requested: u32,
        /// Stock the cart knows about for this product.
        available: u32,
    },

    /// The product has no line in the cart.
    #[error("product {0} is not in the cart")]
    UnknownProduct(Uuid),
}

/// Snapshot of a catalog product at the moment it was added to the cart.
///
/// Price and stock here are the client's last-known values; checkout re-reads
/// the catalog before trusting either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartProduct {
    /// Catalog product id.
    pub uuid: Uuid,
    /// Display name, snapshotted for the order line.
    pub name: String,
    /// Unit price in minor currency units.
    pub unit_price: u64,
    /// Stock the catalog reported when this snapshot was taken.
    pub stock: u32,
    /// Whether the product was active when snapshotted.
    pub active: bool,
}

/// One (product, quantity) pair in the in-progress order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// The product snapshot this line was built against.
    pub product: CartProduct,
    /// Units of the product; always at least 1 and at most `product.stock`.
    pub quantity: u32,
}

impl CartLine {
    /// Line total in minor units.
    pub fn line_total(&self) -> u64 {
        self.product.unit_price * u64::from(self.quantity)
    }
}

/// The client-local source of truth for the in-progress order.
///
/// Lines keep insertion order. The subtotal is always recomputed from the
/// lines, never stored, so it cannot drift from a mutation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CartStore {
    lines: Vec<CartLine>,
    #[serde(skip)]
    index: FxHashMap<Uuid, usize>,
}

impl<'de> Deserialize<'de> for CartStore {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wire {
            lines: Vec<CartLine>,
        }

        let Wire { lines } = Wire::deserialize(deserializer)?;

        let mut store = Self {
            lines,
            index: FxHashMap::default(),
        };

        store.reindex();

        Ok(store)
    }
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `product`, merging into an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InsufficientStock`] when the resulting quantity
    /// would exceed the product's known stock; the cart is left unchanged.
    pub fn add(&mut self, product: CartProduct) -> Result<(), CartError> {
        if let Some(line) = self.line_mut(product.uuid) {
            let requested = line.quantity + 1;

            if requested > line.product.stock {
                return Err(CartError::InsufficientStock {
                    requested,
                    available: line.product.stock,
                });
            }

            line.quantity = requested;

            return Ok(());
        }

        if product.stock < 1 {
            return Err(CartError::InsufficientStock {
                requested: 1,
                available: product.stock,
            });
        }

        self.index.insert(product.uuid, self.lines.len());

        self.lines.push(CartLine {
            product,
            quantity: 1,
        });

        Ok(())
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity of zero removes the line instead of storing it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownProduct`] when no line exists for the
    /// product, or [`CartError::InsufficientStock`] when the quantity exceeds
    /// the product's known stock; in both cases the line is left unchanged.
    pub fn set_quantity(&mut self, product_uuid: Uuid, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            if self.line_mut(product_uuid).is_none() {
                return Err(CartError::UnknownProduct(product_uuid));
            }

            self.remove(product_uuid);

            return Ok(());
        }

        let Some(line) = self.line_mut(product_uuid) else {
            return Err(CartError::UnknownProduct(product_uuid));
        };

        if quantity > line.product.stock {
            return Err(CartError::InsufficientStock {
                requested: quantity,
                available: line.product.stock,
            });
        }

        line.quantity = quantity;

        Ok(())
    }

    /// Remove a line; idempotent, a no-op when the product is absent.
    pub fn remove(&mut self, product_uuid: Uuid) {
        if let Some(position) = self.index.remove(&product_uuid) {
            self.lines.remove(position);
            self.reindex();
        }
    }

    /// Drop every line; called only after a completed checkout.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.index.clear();
    }

    /// Sum of `unit_price × quantity` over all lines, in minor units.
    ///
    /// Recomputed from the lines on every call.
    pub fn subtotal(&self) -> u64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// The lines, in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Look up a line by product id.
    pub fn line(&self, product_uuid: Uuid) -> Option<&CartLine> {
        self.index
            .get(&product_uuid)
            .and_then(|position| self.lines.get(*position))
    }

    /// Number of lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line_mut(&mut self, product_uuid: Uuid) -> Option<&mut CartLine> {
        self.index
            .get(&product_uuid)
            .copied()
            .and_then(|position| self.lines.get_mut(position))
    }

    fn reindex(&mut self) {
        self.index = self
            .lines
            .iter()
            .enumerate()
            .map(|(position, line)| (line.product.uuid, position))
            .collect();
    }
}
