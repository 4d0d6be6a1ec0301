//! Load the fallback dataset into the catalog store.

use pharmaloc_core::{FallbackDataset, FallbackMedicine, Pharmacy};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::catalog::{
    upsert_inventory_item, upsert_pharmacy, upsert_product, NewInventoryItem, NewPharmacy,
    NewProduct,
};

/// Quantity recorded for every seeded stock line.
const SEED_QUANTITY: i32 = 25;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub pharmacies: usize,
    pub products: usize,
    pub inventory_items: usize,
}

/// Upsert every pharmacy and medicine in `dataset`, stocking each medicine at
/// each pharmacy with the price returned by `price_for`.
///
/// Idempotent: re-running overwrites names, coordinates, statuses and prices.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if any statement fails; rows written before the
/// failure are kept.
pub async fn seed_catalog<F>(
    pool: &PgPool,
    dataset: &FallbackDataset,
    mut price_for: F,
) -> Result<SeedSummary, sqlx::Error>
where
    F: FnMut(&Pharmacy, &FallbackMedicine) -> Decimal,
{
    let mut summary = SeedSummary::default();

    for pharmacy in &dataset.pharmacies {
        upsert_pharmacy(pool, &NewPharmacy::from(pharmacy)).await?;
        summary.pharmacies += 1;
    }

    for medicine in &dataset.medicines {
        let product_id = medicine.slug();
        upsert_product(
            pool,
            &NewProduct {
                id: product_id.clone(),
                name: medicine.name.clone(),
            },
        )
        .await?;
        summary.products += 1;

        for pharmacy in &dataset.pharmacies {
            upsert_inventory_item(
                pool,
                &NewInventoryItem {
                    pharmacy_id: pharmacy.id.clone(),
                    product_id: product_id.clone(),
                    unit_price: price_for(pharmacy, medicine),
                    quantity: SEED_QUANTITY,
                },
            )
            .await?;
            summary.inventory_items += 1;
        }
    }

    Ok(summary)
}
