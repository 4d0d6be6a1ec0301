//! The catalog store seam. Records crossing it are loosely typed; see
//! [`crate::validate`] for how they become domain values.

use std::future::Future;

use pharmaloc_db::{InventoryMatchRow, PharmacyRow};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::error::StoreError;

/// A pharmacy as the store holds it. Any field may be missing or malformed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PharmacyRecord {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: Option<String>,
}

/// A stocked product whose name matched the search term, with its pharmacy.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryRecord {
    pub pharmacy: PharmacyRecord,
    pub product_id: String,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

/// Read-only queries the Candidate Retriever needs.
///
/// Matching is case-insensitive substring containment. An empty term on
/// [`CatalogStore::find_pharmacies`] returns every pharmacy.
pub trait CatalogStore: Send + Sync {
    fn find_pharmacies(
        &self,
        term: &str,
    ) -> impl Future<Output = Result<Vec<PharmacyRecord>, StoreError>> + Send;

    fn find_inventory(
        &self,
        term: &str,
    ) -> impl Future<Output = Result<Vec<InventoryRecord>, StoreError>> + Send;
}

/// [`CatalogStore`] backed by the Postgres catalog tables.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl CatalogStore for PgCatalogStore {
    async fn find_pharmacies(&self, term: &str) -> Result<Vec<PharmacyRecord>, StoreError> {
        let rows = pharmaloc_db::search_pharmacies(&self.pool, term).await?;
        Ok(rows.into_iter().map(PharmacyRecord::from).collect())
    }

    async fn find_inventory(&self, term: &str) -> Result<Vec<InventoryRecord>, StoreError> {
        let rows = pharmaloc_db::search_inventory(&self.pool, term).await?;
        Ok(rows.into_iter().map(InventoryRecord::from).collect())
    }
}

impl From<PharmacyRow> for PharmacyRecord {
    fn from(row: PharmacyRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            address: row.address,
            city: row.city,
            phone: row.phone,
            latitude: row.latitude,
            longitude: row.longitude,
            status: row.status,
        }
    }
}

impl From<InventoryMatchRow> for InventoryRecord {
    fn from(row: InventoryMatchRow) -> Self {
        Self {
            pharmacy: PharmacyRecord {
                id: row.pharmacy_id,
                name: row.pharmacy_name,
                address: row.address,
                city: row.city,
                phone: row.phone,
                latitude: row.latitude,
                longitude: row.longitude,
                status: row.status,
            },
            product_id: row.product_id,
            product_name: row.product_name,
            unit_price: row.unit_price,
            quantity: row.quantity,
        }
    }
}
