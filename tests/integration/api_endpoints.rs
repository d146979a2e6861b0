//! HTTP API tests driven through the router with `tower::ServiceExt`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use stemdraw_core::{DiagramPlan, EdgeKind, PlanEdge};
use stemdraw_server::{api, ServerConfig, StemdrawServer};
use stemdraw_test_utils::{sample_problem, series_circuit_plan};

fn test_server(output_dir: &std::path::Path) -> Arc<StemdrawServer> {
    let config = ServerConfig {
        output_dir: output_dir.display().to_string(),
        ..ServerConfig::default()
    };
    Arc::new(StemdrawServer::from_config(config).unwrap())
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_pipeline_capabilities() {
    let dir = tempfile::tempdir().unwrap();
    let app = api::build_router(test_server(dir.path()));

    let response = app
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["llm_planner"], false);
    assert_eq!(body["audit_simulated"], true);
}

#[tokio::test]
async fn generate_returns_result_and_writes_files() {
    let dir = tempfile::tempdir().unwrap();
    let app = api::build_router(test_server(dir.path()));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/generate",
            serde_json::json!({
                "problem_text": sample_problem(stemdraw_core::ProblemDomain::Circuit)
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["plan"]["domain"], "circuit");
    assert!(!body["artifacts"].as_array().unwrap().is_empty());
    let files = body["files"].as_array().unwrap();
    assert!(!files.is_empty());
    for file in files {
        assert!(std::path::Path::new(file.as_str().unwrap()).exists());
    }
}

#[tokio::test]
async fn empty_problem_text_yields_standard_error_shape() {
    let dir = tempfile::tempdir().unwrap();
    let app = api::build_router(test_server(dir.path()));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/generate",
            serde_json::json!({ "problem_text": "  " }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["errorDetails"]["errorCode"],
        "ERR_PIPELINE_VALIDATION"
    );
    assert!(body["error"].as_str().unwrap().contains("problem_text"));
}

#[tokio::test]
async fn editor_generate_does_not_write_files() {
    let dir = tempfile::tempdir().unwrap();
    let app = api::build_router(test_server(dir.path()));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/editor/generate",
            serde_json::json!({
                "problem_text": sample_problem(stemdraw_core::ProblemDomain::Chemistry)
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["plan"]["domain"], "chemistry");
    // Nothing under the output directory for editor runs.
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn editor_validate_reports_structural_issues() {
    let dir = tempfile::tempdir().unwrap();
    let app = api::build_router(test_server(dir.path()));

    let mut plan = series_circuit_plan();
    plan.edges.push(PlanEdge::new(
        "edge-bad",
        "battery-1",
        "missing-node",
        EdgeKind::Wire,
    ));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/editor/validate",
            serde_json::to_value(&plan).unwrap(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["valid"], false);
    let issues = body["issues"].as_array().unwrap();
    assert!(issues
        .iter()
        .any(|i| i["code"] == "DANGLING_EDGE"));
}

#[tokio::test]
async fn editor_validate_scores_a_sound_plan() {
    let dir = tempfile::tempdir().unwrap();
    let app = api::build_router(test_server(dir.path()));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/editor/validate",
            serde_json::to_value(series_circuit_plan()).unwrap(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["quality"]["score"], 100);
}

#[tokio::test]
async fn editor_optimize_layout_positions_every_node() {
    let dir = tempfile::tempdir().unwrap();
    let app = api::build_router(test_server(dir.path()));

    let mut plan = series_circuit_plan();
    for node in &mut plan.nodes {
        node.position = None;
    }

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/editor/optimize_layout",
            serde_json::to_value(&plan).unwrap(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let back: DiagramPlan = serde_json::from_value(body).unwrap();
    assert!(back.is_positioned());
}

#[tokio::test]
async fn editor_save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(dir.path());
    let plan = series_circuit_plan();

    let response = api::build_router(server.clone())
        .oneshot(json_request(
            "POST",
            "/api/editor/save",
            serde_json::to_value(&plan).unwrap(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["saved"], true);
    let id = body["plan_id"].as_str().unwrap().to_string();

    // Load by id
    let response = api::build_router(server.clone())
        .oneshot(
            Request::get(format!("/api/editor/load?plan_id={}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let back: DiagramPlan = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(back, plan);

    // Load latest
    let response = api::build_router(server)
        .oneshot(Request::get("/api/editor/load").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn editor_load_of_missing_plan_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let app = api::build_router(test_server(dir.path()));

    let response = app
        .oneshot(Request::get("/api/editor/load").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["errorDetails"]["errorCode"], "ERR_NOT_FOUND_PLAN");
}

#[tokio::test]
async fn editor_export_writes_artifacts_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let app = api::build_router(test_server(dir.path()));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/editor/export",
            serde_json::to_value(series_circuit_plan()).unwrap(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let files = body["files"].as_array().unwrap();
    assert!(!files.is_empty());
    for file in files {
        let path = std::path::Path::new(file.as_str().unwrap());
        assert!(path.exists());
        assert!(path.starts_with(dir.path()));
    }
}
