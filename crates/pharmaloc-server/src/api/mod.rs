mod pharmacies;
mod search;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::QueryRejection, State},
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use pharmaloc_core::Coordinate;
use pharmaloc_search::{
    LocationResolver, PgCatalogStore, ReportedPosition, ResolveOptions, SearchService,
};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SearchService<PgCatalogStore>>,
    /// `None` when the catalog store is disabled or unreachable.
    pub pool: Option<PgPool>,
    pub resolve_options: ResolveOptions,
    pub default_location: Coordinate,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    pub fn bad_request(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(request_id, "bad_request", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_query_rejection(request_id: String, rejection: &QueryRejection) -> ApiError {
    ApiError::bad_request(request_id, rejection.body_text())
}

/// Per-request resolver over the position the client reported.
///
/// `lat`/`lng` must arrive together. A `geo_error` code (W3C numbering) wins
/// over coordinates.
pub(super) fn reported_resolver(
    request_id: &str,
    state: &AppState,
    lat: Option<f64>,
    lng: Option<f64>,
    geo_error: Option<u16>,
) -> Result<LocationResolver<ReportedPosition>, ApiError> {
    if lat.is_some() != lng.is_some() {
        return Err(ApiError::bad_request(
            request_id,
            "lat and lng must be provided together",
        ));
    }
    let position = ReportedPosition::from_query(lat, lng, geo_error)
        .map_err(|e| ApiError::bad_request(request_id, e.to_string()))?;
    Ok(LocationResolver::new(position, state.default_location))
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

fn search_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/search", get(search::search))
        .route("/api/v1/pharmacies/on-duty", get(pharmacies::list_on_duty))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(search_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    let Some(pool) = state.pool.as_ref() else {
        return (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "disabled",
                },
                meta,
            }),
        );
    };

    match pharmaloc_db::health_check(pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}
