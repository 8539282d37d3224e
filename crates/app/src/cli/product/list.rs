use camber_app::{
    database::{self, Db},
    domain::catalog::{CatalogStore, PgCatalogStore},
};
use clap::Args;

#[derive(Debug, Args)]
pub(crate) struct ListProductsArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: ListProductsArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let store = PgCatalogStore::new(Db::new(pool));

    let products = store
        .list_products()
        .await
        .map_err(|error| format!("failed to list products: {error}"))?;

    if products.is_empty() {
        println!("no products found");
        return Ok(());
    }

    for product in products {
        println!("product_uuid: {}", product.uuid);
        println!("name: {}", product.name);
        println!("price: {}", product.price);
        println!("stock: {}", product.stock);
        println!("active: {}", product.active);
        println!("created_at: {}", product.created_at);
        println!();
    }

    Ok(())
}
