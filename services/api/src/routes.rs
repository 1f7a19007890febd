use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use recruit_desk::candidates::{
    candidate_router, CandidateStore, FilterCriteria, RecruitmentService,
};
use recruit_desk::error::AppError;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_candidate_routes<S>(service: Arc<RecruitmentService<S>>) -> axum::Router
where
    S: CandidateStore + ?Sized + 'static,
{
    candidate_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/filters",
            axum::routing::get(saved_filters_endpoint).put(save_filters_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn saved_filters_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<FilterCriteria> {
    Json(state.filters.current())
}

pub(crate) async fn save_filters_endpoint(
    Extension(state): Extension<AppState>,
    Json(criteria): Json<FilterCriteria>,
) -> Result<Json<serde_json::Value>, AppError> {
    let active = criteria.active_count();
    state.filters.replace(criteria)?;
    Ok(Json(json!({ "status": "saved", "active_filters": active })))
}
