//! Bundled offline dataset used when the catalog store cannot answer.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::pharmacy::Pharmacy;
use crate::ConfigError;

const BUNDLED_DATASET: &str = include_str!("../data/fallback_pharmacies.yaml");

/// Shortest term that may trigger product synthesis (as a whole word).
const MIN_RECOGNIZED_TERM_LEN: usize = 3;

/// Shortest term that may match as a word prefix.
const MIN_PREFIX_LEN: usize = 4;

/// A medicine the fallback path knows how to synthesize a product for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FallbackMedicine {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl FallbackMedicine {
    /// Whether `term` names this medicine.
    ///
    /// The trimmed, lower-cased term must contain a letter and either equal a
    /// word of the name or an alias (three characters or more), or be a prefix
    /// of one (four characters or more). Multi-word terms match as a prefix of
    /// the whole name or alias.
    #[must_use]
    pub fn recognizes(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        let len = needle.chars().count();
        if len < MIN_RECOGNIZED_TERM_LEN || !needle.chars().any(char::is_alphabetic) {
            return false;
        }
        let allow_prefix = len >= MIN_PREFIX_LEN;
        std::iter::once(&self.name)
            .chain(self.aliases.iter())
            .any(|candidate| {
                let candidate = candidate.to_lowercase();
                if allow_prefix && candidate.starts_with(&needle) {
                    return true;
                }
                candidate
                    .split(|c: char| !c.is_alphanumeric())
                    .any(|word| word == needle || (allow_prefix && word.starts_with(&needle)))
            })
    }

    /// URL-safe identifier derived from the name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FallbackDataset {
    pub pharmacies: Vec<Pharmacy>,
    #[serde(default)]
    pub medicines: Vec<FallbackMedicine>,
}

impl FallbackDataset {
    /// Parse and validate the dataset compiled into this crate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the bundled YAML is malformed.
    pub fn bundled() -> Result<Self, ConfigError> {
        parse_fallback_dataset(BUNDLED_DATASET)
    }

    /// First medicine recognizing `term`, if any.
    #[must_use]
    pub fn recognized_medicine(&self, term: &str) -> Option<&FallbackMedicine> {
        self.medicines.iter().find(|m| m.recognizes(term))
    }
}

/// Load the fallback dataset from `path`, or the bundled copy when `None`.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read, parsed, or fails
/// validation.
pub fn load_fallback_dataset(path: Option<&Path>) -> Result<FallbackDataset, ConfigError> {
    let Some(path) = path else {
        return FallbackDataset::bundled();
    };
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FallbackFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_fallback_dataset(&content)
}

fn parse_fallback_dataset(content: &str) -> Result<FallbackDataset, ConfigError> {
    let mut dataset: FallbackDataset = serde_yaml::from_str(content)?;
    for pharmacy in &mut dataset.pharmacies {
        pharmacy.distance_km = None;
    }
    validate_dataset(&dataset)?;
    Ok(dataset)
}

fn validate_dataset(dataset: &FallbackDataset) -> Result<(), ConfigError> {
    if dataset.pharmacies.is_empty() {
        return Err(ConfigError::Validation(
            "fallback dataset must contain at least one pharmacy".to_string(),
        ));
    }

    let mut seen_ids = HashSet::new();
    for pharmacy in &dataset.pharmacies {
        if pharmacy.id.trim().is_empty() || pharmacy.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "fallback pharmacy id and name must be non-empty".to_string(),
            ));
        }
        if !seen_ids.insert(pharmacy.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate fallback pharmacy id: '{}'",
                pharmacy.id
            )));
        }
        if !pharmacy.location.is_valid() {
            return Err(ConfigError::Validation(format!(
                "fallback pharmacy '{}' has out-of-range coordinates ({}, {})",
                pharmacy.id, pharmacy.location.lat, pharmacy.location.lng
            )));
        }
    }

    if let Some(medicine) = dataset.medicines.iter().find(|m| m.slug().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "fallback medicine name '{}' has no usable characters",
            medicine.name
        )));
    }

    Ok(())
}
