use camber::discounts::{DiscountEffect, OwnerBenefit, OwnerReward};
use camber_app::{
    database::{self, Db},
    domain::coupons::{
        CouponsStore, PgCouponsStore,
        models::{CouponUuid, NewCoupon},
    },
};
use clap::Args;
use jiff::Timestamp;
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateCouponArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Code customers enter at checkout
    #[arg(long)]
    code: String,

    /// Percentage taken off the order subtotal
    #[arg(long, conflicts_with = "amount_off")]
    percent: Option<Decimal>,

    /// Fixed amount in minor units taken off the order subtotal
    #[arg(long)]
    amount_off: Option<u64>,

    /// Maximum redemptions; 0 means unlimited
    #[arg(long, default_value_t = 0)]
    usage_limit: u32,

    /// Profile credited on each redemption
    #[arg(long)]
    owner_uuid: Option<Uuid>,

    /// Fixed owner credit in minor units per redemption
    #[arg(long, conflicts_with = "owner_credit_percent")]
    owner_credit_amount: Option<u64>,

    /// Owner credit as a percentage of the order subtotal
    #[arg(long)]
    owner_credit_percent: Option<Decimal>,

    /// Optional expiration timestamp (RFC 3339)
    #[arg(long)]
    expires_at: Option<String>,
}

pub(crate) async fn run(args: CreateCouponArgs) -> Result<(), String> {
    if args.code.trim().is_empty() {
        return Err("code cannot be empty".to_string());
    }

    let effect = match (args.percent, args.amount_off) {
        (Some(percent), None) => DiscountEffect::Percentage(percent),
        (None, Some(amount)) => DiscountEffect::Fixed(amount),
        _ => return Err("exactly one of --percent or --amount-off is required".to_string()),
    };

    let owner = build_owner(
        args.owner_uuid,
        args.owner_credit_amount,
        args.owner_credit_percent,
    )?;

    let expires_at = parse_expires_at(args.expires_at.as_deref())?;

    if let Some(expires_at) = expires_at.as_ref()
        && *expires_at <= Timestamp::now()
    {
        return Err("expires-at must be in the future".to_string());
    }

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let store = PgCouponsStore::new(Db::new(pool));

    let coupon = store
        .create_coupon(NewCoupon {
            uuid: CouponUuid::new(),
            code: args.code,
            effect,
            usage_limit: args.usage_limit,
            owner,
            expires_at,
        })
        .await
        .map_err(|error| format!("failed to create coupon: {error}"))?;

    println!("coupon_uuid: {}", coupon.uuid);
    println!("code: {}", coupon.code);
    println!("usage_limit: {}", coupon.usage_limit);
    if let Some(expires_at) = coupon.expires_at {
        println!("expires_at: {expires_at}");
    }

    Ok(())
}

fn build_owner(
    owner_uuid: Option<Uuid>,
    credit_amount: Option<u64>,
    credit_percent: Option<Decimal>,
) -> Result<Option<OwnerReward>, String> {
    let Some(owner_uuid) = owner_uuid else {
        if credit_amount.is_some() || credit_percent.is_some() {
            return Err("--owner-uuid is required when an owner credit is given".to_string());
        }
        return Ok(None);
    };

    let benefit = match (credit_amount, credit_percent) {
        (Some(amount), None) => OwnerBenefit::Amount(amount),
        (None, Some(percent)) => OwnerBenefit::Percentage(percent),
        _ => {
            return Err(
                "exactly one of --owner-credit-amount or --owner-credit-percent is required with --owner-uuid"
                    .to_string(),
            );
        }
    };

    Ok(Some(OwnerReward {
        owner_uuid,
        benefit,
    }))
}

fn parse_expires_at(raw: Option<&str>) -> Result<Option<Timestamp>, String> {
    raw.map(|value| {
        value
            .parse::<Timestamp>()
            .map_err(|error| format!("invalid expires-at timestamp: {error}"))
    })
    .transpose()
}
