use pharmaloc_core::{rank, PharmacyStatus, SearchResult};
use serde::Serialize;

use crate::location::{GeolocationProvider, LocationResolver, ResolveOptions, ResolvedLocation};
use crate::retriever::{CandidateRetriever, CandidateSource};
use crate::store::CatalogStore;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    /// Free text; empty means "all pharmacies".
    pub term: String,
    pub status: Option<PharmacyStatus>,
    /// Drop results whose product is out of stock.
    pub available_only: bool,
    pub limit: Option<usize>,
}

impl SearchRequest {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Self::default()
        }
    }

    /// Every on-duty pharmacy, nearest first.
    #[must_use]
    pub fn on_duty() -> Self {
        Self {
            status: Some(PharmacyStatus::OnDuty),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub location: ResolvedLocation,
    pub source: CandidateSource,
    pub results: Vec<SearchResult>,
}

/// Resolver, retriever and ranker wired together.
pub struct SearchService<S> {
    retriever: CandidateRetriever<S>,
}

impl<S: CatalogStore> SearchService<S> {
    pub fn new(retriever: CandidateRetriever<S>) -> Self {
        Self { retriever }
    }

    pub fn retriever(&self) -> &CandidateRetriever<S> {
        &self.retriever
    }

    /// Run one search. Location resolution and candidate retrieval run
    /// concurrently; ranking waits for both. Filters apply after ranking.
    pub async fn search<P: GeolocationProvider>(
        &self,
        resolver: &LocationResolver<P>,
        options: &ResolveOptions,
        request: &SearchRequest,
    ) -> SearchOutcome {
        let (location, candidates) = tokio::join!(
            resolver.resolve(options),
            self.retriever.retrieve(&request.term)
        );

        let candidate_count = candidates.results.len();
        let ranked = rank(candidates.results, location.coordinate);
        let results = apply_filters(ranked, request);

        tracing::info!(
            term = %request.term,
            source = ?candidates.source,
            location_status = ?location.status,
            candidates = candidate_count,
            returned = results.len(),
            "search complete"
        );

        SearchOutcome {
            location,
            source: candidates.source,
            results,
        }
    }

    pub async fn on_duty<P: GeolocationProvider>(
        &self,
        resolver: &LocationResolver<P>,
        options: &ResolveOptions,
    ) -> SearchOutcome {
        self.search(resolver, options, &SearchRequest::on_duty())
            .await
    }
}

/// Filters preserve ranked order.
fn apply_filters(ranked: Vec<SearchResult>, request: &SearchRequest) -> Vec<SearchResult> {
    let filtered = ranked
        .into_iter()
        .filter(|r| request.status.is_none_or(|status| r.pharmacy.status == status))
        .filter(|r| !request.available_only || r.product.as_ref().is_none_or(|p| p.available));
    match request.limit {
        Some(limit) => filtered.take(limit).collect(),
        None => filtered.collect(),
    }
}
