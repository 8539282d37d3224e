use std::sync::Arc;

use camber_app::{
    database::{self, Db},
    domain::orders::{OrderHistory, PgOrdersStore, models::UserUuid},
};
use clap::Args;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct ListOrdersArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// User UUID whose orders should be listed
    #[arg(long)]
    user_uuid: Uuid,
}

pub(crate) async fn run(args: ListOrdersArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let history = OrderHistory::new(Arc::new(PgOrdersStore::new(Db::new(pool))))
        .order_history(UserUuid::from_uuid(args.user_uuid))
        .await
        .map_err(|error| format!("failed to list orders: {error}"))?;

    if history.is_empty() {
        println!("no orders found for user {}", args.user_uuid);
        return Ok(());
    }

    for entry in history {
        println!("order_uuid: {}", entry.order.uuid);
        println!("status: {}", entry.order.status.as_str());
        println!("subtotal: {}", entry.order.subtotal);
        println!("shipping_cost: {}", entry.order.shipping_cost);
        println!("discount_amount: {}", entry.order.discount_amount);
        println!("total: {}", entry.order.total);
        if let Some(code) = entry.order.coupon_code.as_deref() {
            println!("coupon_code: {code}");
        }
        println!("created_at: {}", entry.order.created_at);
        for line in &entry.lines {
            println!(
                "  line: {} x{} @ {}",
                line.product_name, line.quantity, line.unit_price
            );
        }
        println!();
    }

    Ok(())
}
