#![allow(dead_code)]

use std::time::Duration;

use pharmaloc_core::FallbackDataset;
use pharmaloc_search::{
    CandidateRetriever, CatalogStore, InventoryRecord, PharmacyRecord, SearchConfig, StoreError,
};
use rust_decimal::Decimal;

/// In-memory store double. Matching mirrors the Postgres queries closely
/// enough for pipeline tests: case-insensitive substring over name/city.
pub enum FakeStore {
    Records {
        pharmacies: Vec<PharmacyRecord>,
        inventory: Vec<InventoryRecord>,
    },
    Failing,
    Hanging,
}

impl FakeStore {
    pub fn with_pharmacies(pharmacies: Vec<PharmacyRecord>) -> Self {
        FakeStore::Records {
            pharmacies,
            inventory: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::with_pharmacies(Vec::new())
    }
}

impl CatalogStore for FakeStore {
    async fn find_pharmacies(&self, term: &str) -> Result<Vec<PharmacyRecord>, StoreError> {
        match self {
            FakeStore::Records { pharmacies, .. } => {
                let needle = term.to_lowercase();
                Ok(pharmacies
                    .iter()
                    .filter(|p| {
                        p.name.to_lowercase().contains(&needle)
                            || p.city
                                .as_deref()
                                .is_some_and(|c| c.to_lowercase().contains(&needle))
                    })
                    .cloned()
                    .collect())
            }
            FakeStore::Failing => Err(StoreError::Unavailable("connection refused".to_string())),
            FakeStore::Hanging => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(Vec::new())
            }
        }
    }

    async fn find_inventory(&self, term: &str) -> Result<Vec<InventoryRecord>, StoreError> {
        match self {
            FakeStore::Records { inventory, .. } => {
                let needle = term.to_lowercase();
                Ok(inventory
                    .iter()
                    .filter(|i| i.product_name.to_lowercase().contains(&needle))
                    .cloned()
                    .collect())
            }
            FakeStore::Failing => Err(StoreError::Unavailable("connection refused".to_string())),
            FakeStore::Hanging => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(Vec::new())
            }
        }
    }
}

pub fn dataset() -> FallbackDataset {
    FallbackDataset::bundled().expect("bundled dataset")
}

pub fn config() -> SearchConfig {
    SearchConfig {
        store_timeout: Duration::from_millis(50),
        ..SearchConfig::new(dataset())
    }
}

pub fn retriever(store: FakeStore) -> CandidateRetriever<FakeStore> {
    CandidateRetriever::new(Some(store), config())
}

/// Kilometres per degree of latitude on a 6371 km sphere.
const KM_PER_DEGREE: f64 = 6371.0 * std::f64::consts::PI / 180.0;

/// A well-formed record `km` due north of Ouagadougou centre.
pub fn record_north(id: &str, km: f64) -> PharmacyRecord {
    PharmacyRecord {
        id: id.to_string(),
        name: format!("Pharmacie {id}"),
        address: None,
        city: Some("Ouagadougou".to_string()),
        phone: None,
        latitude: Some(12.3714 + km / KM_PER_DEGREE),
        longitude: Some(-1.5197),
        status: Some("open".to_string()),
    }
}

pub fn stocked(pharmacy: PharmacyRecord, product: &str, quantity: i32) -> InventoryRecord {
    InventoryRecord {
        pharmacy,
        product_id: product.to_lowercase(),
        product_name: product.to_string(),
        unit_price: Decimal::from(1200),
        quantity,
    }
}
