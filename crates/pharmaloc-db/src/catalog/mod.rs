//! Database operations for the `pharmacies`, `products` and
//! `pharmacy_inventory` tables.

mod read;
mod types;
mod write;

pub use read::{escape_like, search_inventory, search_pharmacies};
pub use types::{InventoryMatchRow, NewInventoryItem, NewPharmacy, NewProduct, PharmacyRow};
pub use write::{upsert_inventory_item, upsert_pharmacy, upsert_product};
