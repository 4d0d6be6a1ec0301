//! Candidate Retriever: store first, bundled dataset when the store cannot
//! answer.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use pharmaloc_core::{AppConfig, FallbackDataset, SearchResult};
use rand::Rng;
use serde::Serialize;

use crate::error::StoreError;
use crate::store::CatalogStore;
use crate::synth::{synthesize_product, PriceRange};
use crate::validate::{accept_inventory, accept_pharmacies};

const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// Retrieval settings passed in explicitly rather than held as process state.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub use_external_store: bool,
    pub fallback: Arc<FallbackDataset>,
    pub price_range: PriceRange,
    /// Client-side bound on each store round trip.
    pub store_timeout: Duration,
}

impl SearchConfig {
    #[must_use]
    pub fn new(fallback: FallbackDataset) -> Self {
        Self {
            use_external_store: true,
            fallback: Arc::new(fallback),
            price_range: PriceRange::default(),
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    #[must_use]
    pub fn from_app_config(config: &AppConfig, fallback: FallbackDataset) -> Self {
        Self {
            use_external_store: config.store_enabled(),
            fallback: Arc::new(fallback),
            price_range: PriceRange::from_app_config(config),
            store_timeout: Duration::from_secs(config.store_timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateSource {
    Store,
    Fallback,
}

/// Unranked candidates and where they came from.
#[derive(Debug, Clone)]
pub struct Candidates {
    pub source: CandidateSource,
    pub results: Vec<SearchResult>,
}

pub struct CandidateRetriever<S> {
    store: Option<S>,
    config: SearchConfig,
}

impl<S: CatalogStore> CandidateRetriever<S> {
    /// `store` may be `None` when no store is configured; every retrieval then
    /// uses the fallback dataset.
    pub fn new(store: Option<S>, config: SearchConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Retrieve unranked candidates for `term`. Never fails: a disabled,
    /// empty, slow or failing store routes to [`CandidateRetriever::fallback`].
    pub async fn retrieve(&self, term: &str) -> Candidates {
        let term = term.trim();
        match self.query_store(term).await {
            Ok(results) if !results.is_empty() => {
                tracing::debug!(term, count = results.len(), "store answered");
                Candidates {
                    source: CandidateSource::Store,
                    results,
                }
            }
            Ok(_) => {
                tracing::debug!(term, "store returned no usable candidates; using fallback dataset");
                self.fallback(term)
            }
            Err(StoreError::Disabled) => {
                tracing::debug!(term, "store disabled; using fallback dataset");
                self.fallback(term)
            }
            Err(error) => {
                tracing::warn!(term, %error, "store query failed; using fallback dataset");
                self.fallback(term)
            }
        }
    }

    /// Candidates from the bundled dataset alone.
    pub fn fallback(&self, term: &str) -> Candidates {
        self.fallback_with_rng(term, &mut rand::rng())
    }

    /// Fallback candidates for `term`, drawing synthesized prices from `rng`.
    ///
    /// - empty term: every pharmacy, no product
    /// - recognized medicine: every pharmacy, each with a synthesized product
    /// - anything else: pharmacies whose name, address or city contains the term
    pub fn fallback_with_rng<R: Rng + ?Sized>(&self, term: &str, rng: &mut R) -> Candidates {
        let term = term.trim();
        let dataset = &self.config.fallback;

        let results = if term.is_empty() {
            dataset
                .pharmacies
                .iter()
                .cloned()
                .map(SearchResult::pharmacy_only)
                .collect()
        } else if let Some(medicine) = dataset.recognized_medicine(term) {
            dataset
                .pharmacies
                .iter()
                .map(|pharmacy| SearchResult {
                    pharmacy: pharmacy.clone(),
                    product: Some(synthesize_product(medicine, self.config.price_range, rng)),
                })
                .collect()
        } else {
            dataset
                .pharmacies
                .iter()
                .filter(|pharmacy| pharmacy.matches_term(term))
                .cloned()
                .map(SearchResult::pharmacy_only)
                .collect()
        };

        Candidates {
            source: CandidateSource::Fallback,
            results,
        }
    }

    async fn query_store(&self, term: &str) -> Result<Vec<SearchResult>, StoreError> {
        let store = match &self.store {
            Some(store) if self.config.use_external_store => store,
            _ => return Err(StoreError::Disabled),
        };
        let timeout = self.config.store_timeout;
        tokio::time::timeout(timeout, fetch_candidates(store, term))
            .await
            .map_err(|_| StoreError::Timeout { elapsed: timeout })?
    }
}

/// Product matches first, then pharmacies matched by name, address or city
/// that were not already paired with a product.
async fn fetch_candidates<S: CatalogStore>(
    store: &S,
    term: &str,
) -> Result<Vec<SearchResult>, StoreError> {
    if term.is_empty() {
        let pharmacies = store.find_pharmacies(term).await?;
        return Ok(accept_pharmacies(pharmacies)
            .into_iter()
            .map(SearchResult::pharmacy_only)
            .collect());
    }

    let (inventory, pharmacies) =
        tokio::try_join!(store.find_inventory(term), store.find_pharmacies(term))?;

    let mut results = accept_inventory(inventory);
    let paired: HashSet<String> = results.iter().map(|r| r.pharmacy.id.clone()).collect();
    results.extend(
        accept_pharmacies(pharmacies)
            .into_iter()
            .filter(|pharmacy| !paired.contains(&pharmacy.id))
            .map(SearchResult::pharmacy_only),
    );
    Ok(results)
}
