//! HTTP-level tests for the REST API.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use recall_core::{RecallConfig, RecallEngine};
use recall_server::{create_server, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

const START: &str = "2024-03-01T09:00:00Z";
const MONTH_LATER: &str = "2024-03-31T09:00:00Z";

fn app() -> Router {
    let engine = RecallEngine::in_memory(RecallConfig::default()).unwrap();
    create_server(AppState::new(engine))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn send_raw(app: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn create_topic(app: &Router, body: Value) -> String {
    let (status, topic) = send(app, "POST", &format!("/topics?as_of={}", START), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    topic["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["topics"], 0);
}

#[tokio::test]
async fn test_topic_lifecycle() {
    let app = app();
    let id = create_topic(
        &app,
        json!({
            "subject": "Data Structures",
            "name": "Binary Trees",
            "exam_type": "competitive",
            "topic_complexity": 8.5,
            "topic_length": 7.0,
            "exam_frequency": 9.0,
            "past_failures": 3
        }),
    )
    .await;

    let (status, topic) = send(&app, "GET", &format!("/topics/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(topic["exam_type"], "competitive");
    assert_eq!(topic["strength"], 1.0);

    let (_, listing) = send(&app, "GET", "/topics", None).await;
    assert_eq!(listing["results"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "DELETE", &format!("/topics/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", &format!("/topics/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "TOP_001");
}

#[tokio::test]
async fn test_fti_after_a_month() {
    let app = app();
    let id = create_topic(
        &app,
        json!({
            "subject": "Data Structures",
            "name": "Binary Trees",
            "topic_complexity": 8.5,
            "topic_length": 7.0,
            "exam_frequency": 9.0,
            "past_failures": 3
        }),
    )
    .await;

    let (status, fti) = send(
        &app,
        "GET",
        &format!("/topics/{}/fti?as_of={}", id, MONTH_LATER),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!((fti["score"].as_f64().unwrap() - 6.575).abs() < 1e-9);
    assert_eq!(fti["category"], "moderate");
    assert_eq!(fti["signals"]["time_decay"], 10.0);
}

#[tokio::test]
async fn test_topic_reads_refresh_fti() {
    let app = app();
    let id = create_topic(
        &app,
        json!({
            "subject": "Data Structures",
            "name": "Binary Trees",
            "topic_complexity": 8.5,
            "topic_length": 7.0,
            "exam_frequency": 9.0,
            "past_failures": 3
        }),
    )
    .await;

    let (status, topic) = send(
        &app,
        "GET",
        &format!("/topics/{}?as_of={}", id, MONTH_LATER),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!((topic["fti_score"].as_f64().unwrap() - 6.575).abs() < 1e-9);
    assert_eq!(topic["fti_category"], "moderate");

    let (_, listing) = send(&app, "GET", &format!("/topics?as_of={}", MONTH_LATER), None).await;
    assert_eq!(listing["results"][0]["fti_category"], "moderate");
}

#[tokio::test]
async fn test_malformed_body_uses_error_shape() {
    let app = app();

    let (status, body) = send_raw(&app, "POST", "/topics", "{\"subject\": ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert!(body["error"]["message"].is_string());

    let (status, body) = send_raw(&app, "POST", "/topics", "{\"subject\": 7}").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_query_uses_error_shape() {
    let app = app();

    let (status, body) = send(&app, "GET", "/retention?days=abc&strength=1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let (status, body) = send(&app, "GET", "/dashboard?as_of=yesterday", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn test_record_attempt_and_answer() {
    let app = app();
    let id = create_topic(&app, json!({"subject": "Biology", "name": "Mitosis"})).await;

    let (status, recorded) = send(
        &app,
        "POST",
        &format!("/topics/{}/attempts?as_of={}", id, START),
        Some(json!({"is_correct": false, "stress_level": 90})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(recorded["topic"]["past_failures"], 1);
    assert!((recorded["topic"]["strength"].as_f64().unwrap() - 1.05).abs() < 1e-12);

    let (status, recorded) = send(
        &app,
        "POST",
        &format!("/topics/{}/answers?as_of={}", id, START),
        Some(json!({
            "user_answer": "chromosomes separate in anaphase",
            "correct_answer": "Anaphase",
            "stress_level": 20
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(recorded["attempt"]["is_correct"], true);

    let (_, attempts) = send(&app, "GET", &format!("/topics/{}/attempts", id), None).await;
    assert_eq!(attempts["results"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_invalid_attempt_is_unprocessable() {
    let app = app();
    let id = create_topic(&app, json!({"subject": "Biology", "name": "Meiosis"})).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/topics/{}/attempts", id),
        Some(json!({"is_correct": true, "stress_level": 150})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VAL_002");
    assert!(body["error"]["suggestion"].is_string());
}

#[tokio::test]
async fn test_attempt_for_unknown_topic() {
    let app = app();
    let (status, _) = send(
        &app,
        "POST",
        "/topics/missing/attempts",
        Some(json!({"is_correct": true, "stress_level": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dashboard_and_forgettable_topics() {
    let app = app();
    let hard = create_topic(
        &app,
        json!({
            "subject": "Algorithms",
            "name": "Dynamic Programming",
            "topic_complexity": 10.0,
            "topic_length": 10.0,
            "exam_frequency": 0.0,
            "past_failures": 7
        }),
    )
    .await;
    create_topic(
        &app,
        json!({
            "subject": "Algorithms",
            "name": "Arrays",
            "topic_complexity": 0.0,
            "topic_length": 0.0,
            "exam_frequency": 0.0
        }),
    )
    .await;

    let (status, dashboard) =
        send(&app, "GET", &format!("/dashboard?as_of={}", MONTH_LATER), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["topics"][0]["id"], hard.as_str());
    let alerts = dashboard["alerts"].as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["severity"], "high");

    let (_, listing) = send(
        &app,
        "GET",
        &format!("/forgettable-topics?as_of={}", MONTH_LATER),
        None,
    )
    .await;
    assert_eq!(listing["statistics"]["high"], 1);
    assert_eq!(listing["statistics"]["safe"], 1);
    assert_eq!(listing["statistics"]["total"], 2);
}

#[tokio::test]
async fn test_curve_and_report() {
    let app = app();
    let id = create_topic(&app, json!({"subject": "Physics", "name": "Optics"})).await;

    let (status, curve) = send(
        &app,
        "GET",
        &format!("/topics/{}/curve?as_of={}", id, START),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(curve["current_retention"], 100.0);
    assert_eq!(curve["schedule"]["curve"].as_array().unwrap().len(), 31);
    assert_eq!(curve["schedule"]["checkpoints"][0]["date"], "2024-03-02");

    let (status, report) = send(&app, "GET", &format!("/report?as_of={}", MONTH_LATER), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["total_topics"], 1);
    assert_eq!(report["readiness_status"], "not_ready");
    assert_eq!(report["alerts"][0]["action"], "schedule revision immediately");
}

#[tokio::test]
async fn test_retention_endpoint() {
    let app = app();

    let (status, body) = send(&app, "GET", "/retention?days=0&strength=1.5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["retention"], 100.0);
    assert_eq!(body["forget_probability"], 0.0);

    let (status, body) = send(&app, "GET", "/retention?days=3&strength=0", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["message"].as_str().unwrap().contains("strength"));
}
