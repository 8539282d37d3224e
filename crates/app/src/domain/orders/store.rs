//! Orders Store

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        amount_to_db, count_to_db,
        orders::{
            errors::OrdersStoreError,
            models::{
                Address, NewOrder, NewOrderLine, Order, OrderInsert, OrderLine, OrderLineUuid,
                OrderStatus, OrderUuid, PaymentMethod, UserUuid,
            },
        },
        try_get_amount, try_get_count,
    },
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_LINES_SQL: &str = include_str!("sql/create_order_lines.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const GET_ORDER_LINES_SQL: &str = include_str!("sql/get_order_lines.sql");

/// Write-once order rows plus the read side for order history.
#[automock]
#[async_trait]
pub trait OrdersStore: Send + Sync {
    /// Insert the order row keyed on its caller-generated uuid.
    ///
    /// An existing row with the same uuid is reported as
    /// [`OrderInsert::AlreadyExists`], never treated as a failure: it means
    /// this call is a retry of an attempt that already went through.
    async fn insert_order(&self, order: NewOrder) -> Result<OrderInsert, OrdersStoreError>;

    /// Batch-insert the order's lines in one statement.
    async fn insert_lines(
        &self,
        order: OrderUuid,
        lines: &[NewOrderLine],
    ) -> Result<(), OrdersStoreError>;

    /// Every order the user owns, newest first.
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersStoreError>;

    /// The lines of one order.
    async fn get_order_lines(&self, order: OrderUuid) -> Result<Vec<OrderLine>, OrdersStoreError>;
}

#[derive(Debug, Clone)]
pub struct PgOrdersStore {
    db: Db,
}

impl PgOrdersStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrdersStore for PgOrdersStore {
    async fn insert_order(&self, order: NewOrder) -> Result<OrderInsert, OrdersStoreError> {
        // ON CONFLICT DO NOTHING turns a duplicate idempotency key into
        // rows_affected == 0 instead of a unique violation.
        let rows_affected = query(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.user_uuid.into_uuid())
            .bind(OrderStatus::Pending.as_str())
            .bind(amount_to_db(order.subtotal, "subtotal")?)
            .bind(amount_to_db(order.shipping_cost, "shipping_cost")?)
            .bind(amount_to_db(order.discount_amount, "discount_amount")?)
            .bind(amount_to_db(order.total, "total")?)
            .bind(order.payment_method.as_str())
            .bind(&order.recipient.recipient_name)
            .bind(&order.recipient.recipient_phone)
            .bind(&order.recipient.shipping_address)
            .bind(order.coupon_code.as_deref())
            .execute(self.db.pool())
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Ok(OrderInsert::AlreadyExists);
        }

        Ok(OrderInsert::Created)
    }

    async fn insert_lines(
        &self,
        order: OrderUuid,
        lines: &[NewOrderLine],
    ) -> Result<(), OrdersStoreError> {
        let mut uuids = Vec::with_capacity(lines.len());
        let mut product_uuids = Vec::with_capacity(lines.len());
        let mut product_names = Vec::with_capacity(lines.len());
        let mut unit_prices = Vec::with_capacity(lines.len());
        let mut quantities = Vec::with_capacity(lines.len());

        for line in lines {
            uuids.push(line.uuid.into_uuid());
            product_uuids.push(line.product_uuid);
            product_names.push(line.product_name.clone());
            unit_prices.push(amount_to_db(line.unit_price, "unit_price")?);
            quantities.push(count_to_db(line.quantity, "quantity")?);
        }

        query(CREATE_ORDER_LINES_SQL)
            .bind(order.into_uuid())
            .bind(&uuids)
            .bind(&product_uuids)
            .bind(&product_names)
            .bind(&unit_prices)
            .bind(&quantities)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    async fn list_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersStoreError> {
        let orders = query_as::<Postgres, Order>(LIST_ORDERS_SQL)
            .bind(user.into_uuid())
            .fetch_all(self.db.pool())
            .await?;

        Ok(orders)
    }

    async fn get_order_lines(&self, order: OrderUuid) -> Result<Vec<OrderLine>, OrdersStoreError> {
        let lines = query_as::<Postgres, OrderLine>(GET_ORDER_LINES_SQL)
            .bind(order.into_uuid())
            .fetch_all(self.db.pool())
            .await?;

        Ok(lines)
    }
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;
        let status =
            OrderStatus::from_str(&status).ok_or_else(|| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: format!("unknown order status {status:?}").into(),
            })?;

        let payment_method: String = row.try_get("payment_method")?;
        let payment_method = PaymentMethod::from_str(&payment_method).ok_or_else(|| {
            sqlx::Error::ColumnDecode {
                index: "payment_method".to_string(),
                source: format!("unknown payment method {payment_method:?}").into(),
            }
        })?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            status,
            subtotal: try_get_amount(row, "subtotal")?,
            shipping_cost: try_get_amount(row, "shipping_cost")?,
            discount_amount: try_get_amount(row, "discount_amount")?,
            total: try_get_amount(row, "total")?,
            payment_method,
            recipient: Address {
                recipient_name: row.try_get("recipient_name")?,
                recipient_phone: row.try_get("recipient_phone")?,
                shipping_address: row.try_get("shipping_address")?,
            },
            coupon_code: row.try_get("coupon_code")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderLineUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            product_uuid: row.try_get::<Uuid, _>("product_uuid")?,
            product_name: row.try_get("product_name")?,
            unit_price: try_get_amount(row, "unit_price")?,
            quantity: try_get_count(row, "quantity")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
