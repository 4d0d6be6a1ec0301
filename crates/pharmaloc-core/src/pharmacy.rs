//! Pharmacy, product and search result types shared across the workspace.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PharmacyStatus {
    Open,
    Closed,
    /// Part of the rotating after-hours roster ("garde").
    OnDuty,
}

impl PharmacyStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PharmacyStatus::Open => "open",
            PharmacyStatus::Closed => "closed",
            PharmacyStatus::OnDuty => "on-duty",
        }
    }
}

impl std::fmt::Display for PharmacyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PharmacyStatus {
    type Err = CoreError;

    /// Accepts the canonical tags plus the `on_duty` and `garde` spellings
    /// found in older store documents.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(PharmacyStatus::Open),
            "closed" => Ok(PharmacyStatus::Closed),
            "on-duty" | "on_duty" | "garde" => Ok(PharmacyStatus::OnDuty),
            _ => Err(CoreError::UnknownStatus(s.to_string())),
        }
    }
}

/// A pharmacy snapshot taken from the store or the fallback dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pharmacy {
    pub id: String,
    pub name: String,
    pub location: Coordinate,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub status: PharmacyStatus,
    /// Distance from the search origin, set only by [`crate::rank`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl Pharmacy {
    /// Case-insensitive substring match over name, address and city.
    ///
    /// An empty (or whitespace-only) term matches every pharmacy.
    #[must_use]
    pub fn matches_term(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        std::iter::once(Some(self.name.as_str()))
            .chain([self.address.as_deref(), self.city.as_deref()])
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Unit price in XOF.
    pub unit_price: Decimal,
    pub available: bool,
}

/// A pharmacy paired with the product that matched the search term, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub pharmacy: Pharmacy,
    pub product: Option<Product>,
}

impl SearchResult {
    #[must_use]
    pub fn pharmacy_only(pharmacy: Pharmacy) -> Self {
        Self {
            pharmacy,
            product: None,
        }
    }
}
