use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use pharmaloc_search::SearchOutcome;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_query_rejection, reported_resolver, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct OnDutyParams {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub geo_error: Option<u16>,
}

/// The "garde" roster, nearest first.
pub(super) async fn list_on_duty(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    params: Result<Query<OnDutyParams>, QueryRejection>,
) -> Result<Json<ApiResponse<SearchOutcome>>, ApiError> {
    let Query(params) = params.map_err(|e| map_query_rejection(req_id.0.clone(), &e))?;
    let resolver = reported_resolver(&req_id.0, &state, params.lat, params.lng, params.geo_error)?;

    let outcome = state.service.on_duty(&resolver, &state.resolve_options).await;

    Ok(Json(ApiResponse {
        data: outcome,
        meta: ResponseMeta::new(req_id.0),
    }))
}
