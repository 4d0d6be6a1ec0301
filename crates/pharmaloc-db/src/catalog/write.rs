//! Write operations for the catalog tables.

use sqlx::PgPool;

use super::types::{NewInventoryItem, NewPharmacy, NewProduct};

/// Insert or update a pharmacy by `id`.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the statement fails.
pub async fn upsert_pharmacy(pool: &PgPool, pharmacy: &NewPharmacy) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO pharmacies (id, name, address, city, phone, latitude, longitude, status) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         ON CONFLICT (id) DO UPDATE SET \
            name = EXCLUDED.name, \
            address = EXCLUDED.address, \
            city = EXCLUDED.city, \
            phone = EXCLUDED.phone, \
            latitude = EXCLUDED.latitude, \
            longitude = EXCLUDED.longitude, \
            status = EXCLUDED.status, \
            updated_at = NOW()",
    )
    .bind(&pharmacy.id)
    .bind(&pharmacy.name)
    .bind(&pharmacy.address)
    .bind(&pharmacy.city)
    .bind(&pharmacy.phone)
    .bind(pharmacy.latitude)
    .bind(pharmacy.longitude)
    .bind(&pharmacy.status)
    .execute(pool)
    .await?;
    Ok(())
}

/// Insert or rename a product by `id`.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the statement fails.
pub async fn upsert_product(pool: &PgPool, product: &NewProduct) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO products (id, name) VALUES ($1, $2) \
         ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, updated_at = NOW()",
    )
    .bind(&product.id)
    .bind(&product.name)
    .execute(pool)
    .await?;
    Ok(())
}

/// Insert or update the stock line for a `(pharmacy, product)` pair.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the statement fails, including when either
/// referenced row does not exist.
pub async fn upsert_inventory_item(
    pool: &PgPool,
    item: &NewInventoryItem,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO pharmacy_inventory (pharmacy_id, product_id, unit_price, quantity) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (pharmacy_id, product_id) DO UPDATE SET \
            unit_price = EXCLUDED.unit_price, \
            quantity = EXCLUDED.quantity, \
            updated_at = NOW()",
    )
    .bind(&item.pharmacy_id)
    .bind(&item.product_id)
    .bind(item.unit_price)
    .bind(item.quantity)
    .execute(pool)
    .await?;
    Ok(())
}
