use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use pharmaloc_core::PharmacyStatus;
use pharmaloc_search::{SearchOutcome, SearchRequest};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_query_rejection, reported_resolver, ApiError, ApiResponse, AppState, ResponseMeta};

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 200;

#[derive(Debug, Deserialize)]
pub(super) struct SearchParams {
    pub q: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub geo_error: Option<u16>,
    pub status: Option<String>,
    pub available_only: Option<bool>,
    pub limit: Option<usize>,
}

pub(super) fn normalize_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

pub(super) async fn search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<ApiResponse<SearchOutcome>>, ApiError> {
    let Query(params) = params.map_err(|e| map_query_rejection(req_id.0.clone(), &e))?;

    let status = params
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(str::parse::<PharmacyStatus>)
        .transpose()
        .map_err(|e| ApiError::bad_request(req_id.0.clone(), e.to_string()))?;
    let resolver = reported_resolver(&req_id.0, &state, params.lat, params.lng, params.geo_error)?;

    let request = SearchRequest {
        term: params.q.unwrap_or_default(),
        status,
        available_only: params.available_only.unwrap_or(false),
        limit: Some(normalize_limit(params.limit)),
    };
    let outcome = state
        .service
        .search(&resolver, &state.resolve_options, &request)
        .await;

    Ok(Json(ApiResponse {
        data: outcome,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_limit_applies_defaults_and_bounds() {
        assert_eq!(normalize_limit(None), 50);
        assert_eq!(normalize_limit(Some(0)), 1);
        assert_eq!(normalize_limit(Some(1_000)), 200);
        assert_eq!(normalize_limit(Some(25)), 25);
    }
}
