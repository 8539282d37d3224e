//! Profile Models

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Profile UUID
pub type ProfileUuid = TypedUuid<Profile>;

/// Profile Model
///
/// Checkout touches exactly one field: `store_credit`, the balance a coupon
/// owner earns per redemption.
#[derive(Debug, Clone)]
pub struct Profile {
    pub uuid: ProfileUuid,
    pub email: String,
    pub store_credit: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
