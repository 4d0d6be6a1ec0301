//! Boundary validation for store records.
//!
//! A record that cannot become a well-typed [`Pharmacy`] is excluded from the
//! batch and logged; the rest of the batch is unaffected.

use std::fmt;

use pharmaloc_core::{Coordinate, Pharmacy, PharmacyStatus, Product, SearchResult};

use crate::store::{InventoryRecord, PharmacyRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    EmptyName,
    MissingCoordinate,
    InvalidCoordinate,
    MissingStatus,
    UnknownStatus(String),
    EmptyProductName,
    NegativePrice,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::EmptyName => f.write_str("empty name"),
            RejectReason::MissingCoordinate => f.write_str("missing coordinate"),
            RejectReason::InvalidCoordinate => f.write_str("coordinate out of range"),
            RejectReason::MissingStatus => f.write_str("missing status"),
            RejectReason::UnknownStatus(raw) => write!(f, "unknown status '{raw}'"),
            RejectReason::EmptyProductName => f.write_str("empty product name"),
            RejectReason::NegativePrice => f.write_str("negative unit price"),
        }
    }
}

/// Convert a store record into a [`Pharmacy`].
///
/// # Errors
///
/// Returns the first [`RejectReason`] that disqualifies the record.
pub fn validate_pharmacy(record: &PharmacyRecord) -> Result<Pharmacy, RejectReason> {
    let name = record.name.trim();
    if name.is_empty() {
        return Err(RejectReason::EmptyName);
    }
    let (Some(lat), Some(lng)) = (record.latitude, record.longitude) else {
        return Err(RejectReason::MissingCoordinate);
    };
    let location = Coordinate::new(lat, lng).map_err(|_| RejectReason::InvalidCoordinate)?;
    let raw_status = record
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(RejectReason::MissingStatus)?;
    let status: PharmacyStatus = raw_status
        .parse()
        .map_err(|_| RejectReason::UnknownStatus(raw_status.to_string()))?;

    Ok(Pharmacy {
        id: record.id.clone(),
        name: name.to_string(),
        location,
        address: non_blank(record.address.as_deref()),
        city: non_blank(record.city.as_deref()),
        phone: non_blank(record.phone.as_deref()),
        status,
        distance_km: None,
    })
}

/// Convert an inventory match into a pharmacy/product pairing.
///
/// # Errors
///
/// Returns a [`RejectReason`] if either the pharmacy or the product is
/// unusable.
pub fn validate_inventory(record: &InventoryRecord) -> Result<SearchResult, RejectReason> {
    let pharmacy = validate_pharmacy(&record.pharmacy)?;
    let product_name = record.product_name.trim();
    if product_name.is_empty() {
        return Err(RejectReason::EmptyProductName);
    }
    if record.unit_price.is_sign_negative() {
        return Err(RejectReason::NegativePrice);
    }
    Ok(SearchResult {
        pharmacy,
        product: Some(Product {
            id: record.product_id.clone(),
            name: product_name.to_string(),
            unit_price: record.unit_price,
            available: record.quantity > 0,
        }),
    })
}

/// Valid pharmacies from `records`, in input order.
pub fn accept_pharmacies(records: Vec<PharmacyRecord>) -> Vec<Pharmacy> {
    records
        .into_iter()
        .filter_map(|record| match validate_pharmacy(&record) {
            Ok(pharmacy) => Some(pharmacy),
            Err(reason) => {
                tracing::warn!(pharmacy_id = %record.id, %reason, "excluding malformed pharmacy record");
                None
            }
        })
        .collect()
}

/// Valid inventory pairings from `records`, in input order.
pub fn accept_inventory(records: Vec<InventoryRecord>) -> Vec<SearchResult> {
    records
        .into_iter()
        .filter_map(|record| match validate_inventory(&record) {
            Ok(result) => Some(result),
            Err(reason) => {
                tracing::warn!(
                    pharmacy_id = %record.pharmacy.id,
                    product_id = %record.product_id,
                    %reason,
                    "excluding malformed inventory record"
                );
                None
            }
        })
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
