use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{CandidateId, InterviewRound, SelectionStatus};
use super::editor::EditorError;
use super::export::{ExportError, ExportFormat};
use super::filter::FilterCriteria;
use super::service::{RecruitmentService, ServiceError};
use super::store::CandidateStore;

/// Router builder exposing the dashboard's search, analytics, export, and editing endpoints.
pub fn candidate_router<S>(service: Arc<RecruitmentService<S>>) -> Router
where
    S: CandidateStore + ?Sized + 'static,
{
    Router::new()
        .route("/api/v1/candidates/search", post(search_handler::<S>))
        .route("/api/v1/candidates/analytics", post(analytics_handler::<S>))
        .route("/api/v1/candidates/export", post(export_handler::<S>))
        .route("/api/v1/candidates/options", get(options_handler::<S>))
        .route("/api/v1/candidates/:candidate_id", get(detail_handler::<S>))
        .route(
            "/api/v1/candidates/:candidate_id/hackerearth-score",
            put(score_handler::<S>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/rounds",
            post(add_round_handler::<S>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/rounds/:position",
            put(edit_round_handler::<S>).delete(delete_round_handler::<S>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/status",
            put(status_handler::<S>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExportQuery {
    format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    score: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusRequest {
    status: SelectionStatus,
}

pub(crate) async fn search_handler<S>(
    State(service): State<Arc<RecruitmentService<S>>>,
    axum::Json(criteria): axum::Json<FilterCriteria>,
) -> Response
where
    S: CandidateStore + ?Sized + 'static,
{
    let result = service.search(&criteria);
    (StatusCode::OK, axum::Json(result)).into_response()
}

pub(crate) async fn analytics_handler<S>(
    State(service): State<Arc<RecruitmentService<S>>>,
    axum::Json(criteria): axum::Json<FilterCriteria>,
) -> Response
where
    S: CandidateStore + ?Sized + 'static,
{
    let report = service.analytics(&criteria);
    (StatusCode::OK, axum::Json(report)).into_response()
}

pub(crate) async fn export_handler<S>(
    State(service): State<Arc<RecruitmentService<S>>>,
    Query(query): Query<ExportQuery>,
    axum::Json(criteria): axum::Json<FilterCriteria>,
) -> Response
where
    S: CandidateStore + ?Sized + 'static,
{
    let format = match query.format.as_deref() {
        None => ExportFormat::default(),
        Some(raw) => match ExportFormat::parse(raw) {
            Some(format) => format,
            None => {
                let payload = json!({
                    "error": format!("unsupported export format `{raw}`"),
                });
                return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
            }
        },
    };

    match service.export(&criteria, format, Utc::now().date_naive()) {
        Ok(artifact) => {
            let disposition = format!("attachment; filename=\"{}\"", artifact.file_name);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, artifact.content_type.to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                artifact.body,
            )
                .into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn options_handler<S>(
    State(service): State<Arc<RecruitmentService<S>>>,
) -> Response
where
    S: CandidateStore + ?Sized + 'static,
{
    (StatusCode::OK, axum::Json(service.filter_options())).into_response()
}

pub(crate) async fn detail_handler<S>(
    State(service): State<Arc<RecruitmentService<S>>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    S: CandidateStore + ?Sized + 'static,
{
    match service.candidate(&CandidateId(candidate_id)) {
        Ok(detail) => (StatusCode::OK, axum::Json(detail)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn score_handler<S>(
    State(service): State<Arc<RecruitmentService<S>>>,
    Path(candidate_id): Path<String>,
    axum::Json(request): axum::Json<ScoreRequest>,
) -> Response
where
    S: CandidateStore + ?Sized + 'static,
{
    match service.update_score(&CandidateId(candidate_id), request.score) {
        Ok(draft) => (StatusCode::OK, axum::Json(draft)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn add_round_handler<S>(
    State(service): State<Arc<RecruitmentService<S>>>,
    Path(candidate_id): Path<String>,
    axum::Json(round): axum::Json<InterviewRound>,
) -> Response
where
    S: CandidateStore + ?Sized + 'static,
{
    match service.add_round(&CandidateId(candidate_id), round) {
        Ok((position, draft)) => {
            let payload = json!({
                "position": position,
                "draft": draft,
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn edit_round_handler<S>(
    State(service): State<Arc<RecruitmentService<S>>>,
    Path((candidate_id, position)): Path<(String, usize)>,
    axum::Json(round): axum::Json<InterviewRound>,
) -> Response
where
    S: CandidateStore + ?Sized + 'static,
{
    match service.edit_round(&CandidateId(candidate_id), position, round) {
        Ok(draft) => (StatusCode::OK, axum::Json(draft)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_round_handler<S>(
    State(service): State<Arc<RecruitmentService<S>>>,
    Path((candidate_id, position)): Path<(String, usize)>,
) -> Response
where
    S: CandidateStore + ?Sized + 'static,
{
    match service.delete_round(&CandidateId(candidate_id), position) {
        Ok((removed, draft)) => {
            let payload = json!({
                "removed": removed,
                "draft": draft,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<S>(
    State(service): State<Arc<RecruitmentService<S>>>,
    Path(candidate_id): Path<String>,
    axum::Json(request): axum::Json<StatusRequest>,
) -> Response
where
    S: CandidateStore + ?Sized + 'static,
{
    match service.update_status(&CandidateId(candidate_id), request.status) {
        Ok(draft) => (StatusCode::OK, axum::Json(draft)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ServiceError) -> Response {
    let status = if error.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        match &error {
            ServiceError::Editor(EditorError::EmptyRoundLabel)
            | ServiceError::Export(ExportError::Empty) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Editor(EditorError::RoundOutOfRange { .. }) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
