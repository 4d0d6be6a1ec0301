//! Row types for the catalog tables.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// A row from the `pharmacies` table.
///
/// Coordinates and status are nullable in storage; callers decide what to do
/// with incomplete rows.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PharmacyRow {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// A product stocked by a pharmacy whose name matched a search term, joined
/// with the stocking pharmacy.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InventoryMatchRow {
    pub pharmacy_id: String,
    pub pharmacy_name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: Option<String>,
    pub product_id: String,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

/// Input record for inserting/upserting a pharmacy.
#[derive(Debug, Clone)]
pub struct NewPharmacy {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct NewInventoryItem {
    pub pharmacy_id: String,
    pub product_id: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

impl From<&pharmaloc_core::Pharmacy> for NewPharmacy {
    fn from(p: &pharmaloc_core::Pharmacy) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            address: p.address.clone(),
            city: p.city.clone(),
            phone: p.phone.clone(),
            latitude: Some(p.location.lat),
            longitude: Some(p.location.lng),
            status: Some(p.status.as_str().to_string()),
        }
    }
}
