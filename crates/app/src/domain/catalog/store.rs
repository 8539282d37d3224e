//! Catalog Store

use async_trait::async_trait;
use mockall::automock;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as};

use crate::{
    database::Db,
    domain::{
        amount_to_db,
        catalog::{
            errors::CatalogStoreError,
            models::{NewProduct, Product, ProductUuid, StockAdjustment},
        },
        count_to_db, try_get_amount, try_get_count,
    },
};

const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const DECREMENT_STOCK_SQL: &str = include_str!("sql/decrement_stock.sql");

/// Read and conditional-write access to the product catalog.
#[automock]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Fetch a product by id.
    async fn get_product(&self, product: ProductUuid) -> Result<Product, CatalogStoreError>;

    /// List the catalog, newest first.
    async fn list_products(&self) -> Result<Vec<Product>, CatalogStoreError>;

    /// Create a product with the given details.
    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogStoreError>;

    /// Decrement a product's stock by `quantity`, conditioned on the current
    /// stock covering it at write time. Never drives stock negative.
    async fn decrement_stock(
        &self,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<StockAdjustment, CatalogStoreError>;
}

#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    db: Db,
}

impl PgCatalogStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn get_product(&self, product: ProductUuid) -> Result<Product, CatalogStoreError> {
        let product = query_as::<Postgres, Product>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(self.db.pool())
            .await?;

        Ok(product)
    }

    async fn list_products(&self) -> Result<Vec<Product>, CatalogStoreError> {
        let products = query_as::<Postgres, Product>(LIST_PRODUCTS_SQL)
            .fetch_all(self.db.pool())
            .await?;

        Ok(products)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogStoreError> {
        let price = amount_to_db(product.price, "price")?;
        let stock = count_to_db(product.stock, "stock")?;

        let created = query_as::<Postgres, Product>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(&product.name)
            .bind(price)
            .bind(stock)
            .fetch_one(self.db.pool())
            .await?;

        Ok(created)
    }

    async fn decrement_stock(
        &self,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<StockAdjustment, CatalogStoreError> {
        // Single conditional statement: the WHERE clause is the compare half
        // of the compare-and-decrement, so concurrent buyers cannot oversell.
        let quantity = count_to_db(quantity, "stock")?;

        let rows_affected = query(DECREMENT_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(quantity)
            .execute(self.db.pool())
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Ok(StockAdjustment::InsufficientStock);
        }

        Ok(StockAdjustment::Adjusted)
    }
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        use jiff_sqlx::Timestamp as SqlxTimestamp;

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            price: try_get_amount(row, "price")?,
            stock: try_get_count(row, "stock")?,
            active: row.try_get("active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
