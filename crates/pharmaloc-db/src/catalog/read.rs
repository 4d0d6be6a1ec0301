//! Read operations for the catalog tables.
//!
//! Term matching is case-insensitive substring containment (`ILIKE`), with
//! `%`, `_` and `\` in the term matched literally.

use sqlx::PgPool;

use super::types::{InventoryMatchRow, PharmacyRow};

/// Escape `ILIKE` metacharacters so `term` matches literally.
#[must_use]
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term.trim()))
}

/// Pharmacies whose name, address or city contains `term`.
///
/// An empty term returns every pharmacy. Ordered by `name ASC, id ASC`.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn search_pharmacies(pool: &PgPool, term: &str) -> Result<Vec<PharmacyRow>, sqlx::Error> {
    sqlx::query_as::<_, PharmacyRow>(
        "SELECT id, name, address, city, phone, latitude, longitude, status, updated_at \
         FROM pharmacies \
         WHERE name ILIKE $1 \
            OR COALESCE(address, '') ILIKE $1 \
            OR COALESCE(city, '') ILIKE $1 \
         ORDER BY name ASC, id ASC",
    )
    .bind(contains_pattern(term))
    .fetch_all(pool)
    .await
}

/// Stocked products whose name contains `term`, joined with their pharmacy.
///
/// Out-of-stock rows (`quantity = 0`) are included so callers can show the
/// product as unavailable. Ordered by pharmacy name, then product name.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn search_inventory(
    pool: &PgPool,
    term: &str,
) -> Result<Vec<InventoryMatchRow>, sqlx::Error> {
    sqlx::query_as::<_, InventoryMatchRow>(
        "SELECT \
            ph.id AS pharmacy_id, \
            ph.name AS pharmacy_name, \
            ph.address, ph.city, ph.phone, ph.latitude, ph.longitude, ph.status, \
            pr.id AS product_id, \
            pr.name AS product_name, \
            inv.unit_price, \
            inv.quantity \
         FROM pharmacy_inventory inv \
         JOIN pharmacies ph ON ph.id = inv.pharmacy_id \
         JOIN products pr ON pr.id = inv.product_id \
         WHERE pr.name ILIKE $1 \
         ORDER BY ph.name ASC, ph.id ASC, pr.name ASC",
    )
    .bind(contains_pattern(term))
    .fetch_all(pool)
    .await
}
