//! Store administration: migrations and seeding.

use pharmaloc_core::AppConfig;
use pharmaloc_search::PriceRange;
use rand::{rngs::StdRng, SeedableRng};

pub(crate) async fn run_migrate(config: &AppConfig) -> anyhow::Result<()> {
    let pool = pharmaloc_db::connect_from_app_config(config).await?;
    let applied = pharmaloc_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations complete");
    println!("applied {applied} migration(s)");
    Ok(())
}

/// Write the fallback dataset into the store, stocking every recognized
/// medicine at every pharmacy with a random price from the configured range.
pub(crate) async fn run_seed(config: &AppConfig) -> anyhow::Result<()> {
    let dataset = pharmaloc_core::load_fallback_dataset(config.fallback_path.as_deref())?;
    let pool = pharmaloc_db::connect_from_app_config(config).await?;
    pharmaloc_db::run_migrations(&pool).await?;

    let range = PriceRange::from_app_config(config);
    let mut rng = StdRng::from_rng(&mut rand::rng());
    let summary =
        pharmaloc_db::seed_catalog(&pool, &dataset, |_, _| range.sample(&mut rng)).await?;

    tracing::info!(
        pharmacies = summary.pharmacies,
        products = summary.products,
        inventory_items = summary.inventory_items,
        "seed complete"
    );
    println!(
        "seeded {} pharmacies, {} products, {} stock lines",
        summary.pharmacies, summary.products, summary.inventory_items
    );
    Ok(())
}
