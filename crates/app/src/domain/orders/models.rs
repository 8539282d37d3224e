//! Order Models

use jiff::Timestamp;
use uuid::Uuid;

use crate::uuids::TypedUuid;

/// Marker for the authenticated storefront user; the auth provider owns the
/// actual account records.
#[derive(Debug, Clone, Copy)]
pub struct User;

/// User UUID
pub type UserUuid = TypedUuid<User>;

/// Order UUID
///
/// Generated by the caller before any write; doubles as the idempotency key
/// for the whole placement attempt.
pub type OrderUuid = TypedUuid<Order>;

/// Order Line UUID
pub type OrderLineUuid = TypedUuid<OrderLine>;

/// Order lifecycle status. Checkout only ever creates `Pending` orders; the
/// later transitions belong to fulfilment and cancellation flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "shipped" => Some(Self::Shipped),
            "delivered" => Some(Self::Delivered),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Where and to whom the order ships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub recipient_name: String,
    pub recipient_phone: String,
    pub shipping_address: String,
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Card,
    BankTransfer,
    CashOnDelivery,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::BankTransfer => "bank_transfer",
            Self::CashOnDelivery => "cash_on_delivery",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "card" => Some(Self::Card),
            "bank_transfer" => Some(Self::BankTransfer),
            "cash_on_delivery" => Some(Self::CashOnDelivery),
            _ => None,
        }
    }
}

/// Order Model
#[derive(Debug, Clone)]
pub struct Order {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub status: OrderStatus,
    pub subtotal: u64,
    pub shipping_cost: u64,
    pub discount_amount: u64,
    /// Always `subtotal + shipping_cost - discount_amount`.
    pub total: u64,
    pub payment_method: PaymentMethod,
    pub recipient: Address,
    pub coupon_code: Option<String>,
    pub created_at: Timestamp,
}

/// New Order Model
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub subtotal: u64,
    pub shipping_cost: u64,
    pub discount_amount: u64,
    pub total: u64,
    pub payment_method: PaymentMethod,
    pub recipient: Address,
    pub coupon_code: Option<String>,
}

/// OrderLine Model
///
/// Name and unit price are snapshots taken at checkout, so history stays
/// accurate when the catalog changes later. Lines are never mutated.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub uuid: OrderLineUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: Uuid,
    pub product_name: String,
    pub unit_price: u64,
    pub quantity: u32,
    pub created_at: Timestamp,
}

/// New Order Line Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderLine {
    pub uuid: OrderLineUuid,
    pub product_uuid: Uuid,
    pub product_name: String,
    pub unit_price: u64,
    pub quantity: u32,
}

/// Outcome of the idempotency-keyed order insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderInsert {
    /// A fresh order row was written.
    Created,
    /// The key already exists: this call is a retry of a placed attempt.
    AlreadyExists,
}
