//! Product synthesis for the offline fallback path.

use pharmaloc_core::{AppConfig, FallbackMedicine, Product};
use rand::Rng;
use rust_decimal::Decimal;

/// Synthesized prices land on multiples of this many XOF.
const PRICE_STEP: Decimal = Decimal::from_parts(25, 0, 0, false, 0);

/// Inclusive price bounds, in XOF, for synthesized products.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    min: Decimal,
    max: Decimal,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: Decimal::from(500),
            max: Decimal::from(5000),
        }
    }
}

impl PriceRange {
    /// `None` when `min > max` or either bound is negative.
    #[must_use]
    pub fn new(min: Decimal, max: Decimal) -> Option<Self> {
        (min <= max && !min.is_sign_negative()).then_some(Self { min, max })
    }

    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(config.fallback_price_min, config.fallback_price_max).unwrap_or_default()
    }

    #[must_use]
    pub fn min(&self) -> Decimal {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> Decimal {
        self.max
    }

    #[must_use]
    pub fn contains(&self, price: Decimal) -> bool {
        self.min <= price && price <= self.max
    }

    /// A random price on the 25 XOF grid inside the range. Ranges too narrow
    /// to hold a grid point yield `min`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Decimal {
        let lo = i64::try_from((self.min / PRICE_STEP).ceil());
        let hi = i64::try_from((self.max / PRICE_STEP).floor());
        match (lo, hi) {
            (Ok(lo), Ok(hi)) if lo <= hi => Decimal::from(rng.random_range(lo..=hi)) * PRICE_STEP,
            _ => self.min,
        }
    }
}

/// A plausible stocked product for `medicine`, always marked available.
pub fn synthesize_product<R: Rng + ?Sized>(
    medicine: &FallbackMedicine,
    range: PriceRange,
    rng: &mut R,
) -> Product {
    Product {
        id: format!("fallback-{}", medicine.slug()),
        name: medicine.name.clone(),
        unit_price: range.sample(rng),
        available: true,
    }
}
