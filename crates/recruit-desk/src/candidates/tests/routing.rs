use super::common::*;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::candidates::domain::{InterviewRound, RoundResult};
use crate::candidates::filter::FilterCriteria;
use crate::candidates::router::{self, candidate_router};

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("encode body")))
        .expect("request builds")
}

#[tokio::test]
async fn search_route_returns_records_and_stats() {
    let (service, _) = build_service();
    let router = candidate_router(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/candidates/search",
            json!({ "branch": "CSE", "min_cgpa": "8.5" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let ids: Vec<&str> = payload["records"]
        .as_array()
        .expect("records array")
        .iter()
        .filter_map(|record| record["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["c1", "c5"]);
    assert_eq!(payload["stats"]["total"], json!(5));
    assert_eq!(payload["stats"]["filtered"], json!(2));
    assert_eq!(payload["stats"]["active_filters"], json!(2));
}

#[tokio::test]
async fn analytics_route_reports_distributions() {
    let (service, _) = build_service();
    let router = candidate_router(service);

    let response = router
        .oneshot(json_request("POST", "/api/v1/candidates/analytics", json!({})))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status_distribution"].as_array().map(Vec::len), Some(3));
    assert_eq!(payload["score_distribution"].as_array().map(Vec::len), Some(5));
    assert_eq!(payload["college_distribution"][0]["group"], json!("IIT Bombay"));
}

#[tokio::test]
async fn export_route_returns_attachment() {
    let (service, _) = build_service();
    let router = candidate_router(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/candidates/export?format=json",
            json!({ "selection_status": "selected" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"candidates_export_"));
    assert!(disposition.ends_with(".json\""));

    let body = read_json_body(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn export_handler_rejects_empty_results() {
    let (service, _) = build_service();

    let response = router::export_handler::<CountingStore>(
        State(service),
        Query(serde_json::from_value(json!({ "format": "csv" })).expect("query")),
        axum::Json(FilterCriteria {
            search: "nobody".to_string(),
            ..FilterCriteria::default()
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn export_handler_rejects_unknown_format() {
    let (service, _) = build_service();

    let response = router::export_handler::<CountingStore>(
        State(service),
        Query(serde_json::from_value(json!({ "format": "xlsx" })).expect("query")),
        axum::Json(FilterCriteria::default()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn detail_handler_returns_round_summary() {
    let (service, _) = build_service();

    let response =
        router::detail_handler::<CountingStore>(State(service), Path("c5".to_string())).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["record"]["name"], json!("Zoya Khan"));
    assert_eq!(payload["rounds"]["tally"]["total"], json!(2));
    assert_eq!(payload["rounds"]["groups"][1]["label"], json!("Final"));
    assert_eq!(payload["rounds"]["groups"][1]["overall"], json!("pending"));
    let percent = payload["cgpa_percent"].as_f64().expect("numeric percent");
    assert!((percent - 88.0).abs() < 1e-9);
}

#[tokio::test]
async fn detail_handler_returns_not_found() {
    let (service, _) = build_service();

    let response =
        router::detail_handler::<CountingStore>(State(service), Path("ghost".to_string())).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn add_round_handler_rejects_blank_label() {
    let (service, store) = build_service();

    let response = router::add_round_handler::<CountingStore>(
        State(service),
        Path("c1".to_string()),
        axum::Json(InterviewRound::new(" ", 50.0, RoundResult::Pass)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(store.writes(), 0);
}

#[tokio::test]
async fn round_routes_edit_and_delete_by_position() {
    let (service, store) = build_service();
    let router = candidate_router(service.clone());

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/candidates/c4/rounds",
            json!({ "round": "L1", "score": 77, "result": "pass", "reviewer": "Dev" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["position"], json!(1));

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/candidates/c4/rounds/5",
            json!({ "round": "L2", "score": 10, "result": "fail" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = router
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/v1/candidates/c4/rounds/0")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["removed"]["round"], json!("Group Discussion"));

    let rounds = service
        .roster()
        .find(&candidate("c4"))
        .expect("in roster")
        .interview_rounds;
    assert_eq!(rounds.len(), 1);
    assert_eq!(rounds[0].round, "L1");
    assert_eq!(store.writes(), 2);
}

#[tokio::test]
async fn status_and_score_routes_update_the_roster() {
    let (service, _) = build_service();
    let router = candidate_router(service.clone());

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/candidates/c2/status",
            json!({ "status": "selected" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(json_request(
            "PUT",
            "/api/v1/candidates/c2/hackerearth-score",
            json!({ "score": 91 }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["selection_status"], json!("selected"));
    assert_eq!(payload["hackerearth_score"], json!(91.0));

    let record = service.roster().find(&candidate("c2")).expect("in roster");
    assert_eq!(record.hackerearth_score, 91.0);
}

#[tokio::test]
async fn store_failures_map_to_internal_error() {
    let (service, store) = build_service();
    store.reject_writes();

    let response = router::status_handler::<CountingStore>(
        State(service),
        Path("c1".to_string()),
        axum::Json(serde_json::from_value(json!({ "status": "rejected" })).expect("request")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("database offline"));
}

#[tokio::test]
async fn options_route_lists_distinct_values() {
    let (service, _) = build_service();
    let router = candidate_router(service);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/v1/candidates/options")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["colleges"],
        json!(["BITS Pilani", "IIT Bombay", "NIT Trichy"])
    );
    assert_eq!(payload["branches"], json!(["CSE", "ECE"]));
}
