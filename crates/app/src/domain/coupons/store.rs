//! Coupons Store

use async_trait::async_trait;
use camber::discounts::{DiscountEffect, OwnerBenefit, OwnerReward};
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        amount_to_db, count_to_db,
        coupons::{
            errors::CouponsStoreError,
            models::{Coupon, CouponUuid, NewCoupon, UsageIncrement},
        },
        try_get_count,
    },
};

const FIND_COUPON_BY_CODE_SQL: &str = include_str!("sql/find_coupon_by_code.sql");
const GET_COUPON_SQL: &str = include_str!("sql/get_coupon.sql");
const CREATE_COUPON_SQL: &str = include_str!("sql/create_coupon.sql");
const INCREMENT_USAGE_SQL: &str = include_str!("sql/increment_usage.sql");

/// Read and conditional-write access to coupons.
#[automock]
#[async_trait]
pub trait CouponsStore: Send + Sync {
    /// Look a coupon up by its customer-facing code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, CouponsStoreError>;

    /// Fetch a coupon by id.
    async fn get_coupon(&self, coupon: CouponUuid) -> Result<Coupon, CouponsStoreError>;

    /// Create a coupon with the given details.
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<Coupon, CouponsStoreError>;

    /// Increment `times_used` by one, conditioned on it still being
    /// `expected_times_used`. A blind increment would lose concurrent
    /// redemptions of the same code.
    async fn increment_usage(
        &self,
        coupon: CouponUuid,
        expected_times_used: u32,
    ) -> Result<UsageIncrement, CouponsStoreError>;
}

#[derive(Debug, Clone)]
pub struct PgCouponsStore {
    db: Db,
}

impl PgCouponsStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CouponsStore for PgCouponsStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, CouponsStoreError> {
        let coupon = query_as::<Postgres, Coupon>(FIND_COUPON_BY_CODE_SQL)
            .bind(code)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(coupon)
    }

    async fn get_coupon(&self, coupon: CouponUuid) -> Result<Coupon, CouponsStoreError> {
        let coupon = query_as::<Postgres, Coupon>(GET_COUPON_SQL)
            .bind(coupon.into_uuid())
            .fetch_one(self.db.pool())
            .await?;

        Ok(coupon)
    }

    async fn create_coupon(&self, coupon: NewCoupon) -> Result<Coupon, CouponsStoreError> {
        let (discount_percentage, discount_amount) = match coupon.effect {
            DiscountEffect::Percentage(percentage) => (Some(percentage), None),
            DiscountEffect::Fixed(amount) => {
                (None, Some(amount_to_db(amount, "discount_amount")?))
            }
        };

        let (owner_uuid, benefit_type, benefit_value) = match coupon.owner {
            None => (None, "none", None),
            Some(OwnerReward {
                owner_uuid,
                benefit: OwnerBenefit::Percentage(percentage),
            }) => (Some(owner_uuid), "percentage", Some(percentage)),
            Some(OwnerReward {
                owner_uuid,
                benefit: OwnerBenefit::Amount(amount),
            }) => (Some(owner_uuid), "amount", Some(Decimal::from(amount))),
        };

        let created = query_as::<Postgres, Coupon>(CREATE_COUPON_SQL)
            .bind(coupon.uuid.into_uuid())
            .bind(&coupon.code)
            .bind(discount_percentage)
            .bind(discount_amount)
            .bind(count_to_db(coupon.usage_limit, "usage_limit")?)
            .bind(owner_uuid)
            .bind(benefit_type)
            .bind(benefit_value)
            .bind(coupon.expires_at.map(SqlxTimestamp::from))
            .fetch_one(self.db.pool())
            .await?;

        Ok(created)
    }

    async fn increment_usage(
        &self,
        coupon: CouponUuid,
        expected_times_used: u32,
    ) -> Result<UsageIncrement, CouponsStoreError> {
        let expected = count_to_db(expected_times_used, "times_used")?;

        let rows_affected = query(INCREMENT_USAGE_SQL)
            .bind(coupon.into_uuid())
            .bind(expected)
            .execute(self.db.pool())
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Ok(UsageIncrement::Conflict);
        }

        Ok(UsageIncrement::Applied)
    }
}

impl<'r> FromRow<'r, PgRow> for Coupon {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let discount_percentage: Option<Decimal> = row.try_get("discount_percentage")?;
        let discount_amount: Option<i64> = row.try_get("discount_amount")?;

        let effect = match (discount_percentage, discount_amount) {
            (Some(percentage), _) => Some(DiscountEffect::Percentage(percentage)),
            (None, Some(amount)) => Some(DiscountEffect::Fixed(decode_amount(amount)?)),
            (None, None) => None,
        };

        let owner = decode_owner(row)?;

        Ok(Self {
            uuid: CouponUuid::from_uuid(row.try_get("uuid")?),
            code: row.try_get("code")?,
            effect,
            usage_limit: try_get_count(row, "usage_limit")?,
            times_used: try_get_count(row, "times_used")?,
            owner,
            active: row.try_get("active")?,
            expires_at: row
                .try_get::<Option<SqlxTimestamp>, _>("expires_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

fn decode_owner(row: &PgRow) -> sqlx::Result<Option<OwnerReward>> {
    let Some(owner_uuid) = row.try_get::<Option<Uuid>, _>("owner_uuid")? else {
        return Ok(None);
    };

    let benefit_type: String = row.try_get("owner_benefit_type")?;
    let benefit_value: Option<Decimal> = row.try_get("owner_benefit_value")?;

    let benefit = match (benefit_type.as_str(), benefit_value) {
        ("percentage", Some(value)) => OwnerBenefit::Percentage(value),
        ("amount", Some(value)) => {
            let amount = value.to_u64().ok_or_else(|| sqlx::Error::ColumnDecode {
                index: "owner_benefit_value".to_string(),
                source: "benefit amount out of range".into(),
            })?;

            OwnerBenefit::Amount(amount)
        }
        _ => return Ok(None),
    };

    Ok(Some(OwnerReward {
        owner_uuid,
        benefit,
    }))
}

fn decode_amount(amount: i64) -> sqlx::Result<u64> {
    u64::try_from(amount).map_err(|e| sqlx::Error::ColumnDecode {
        index: "discount_amount".to_string(),
        source: Box::new(e),
    })
}
