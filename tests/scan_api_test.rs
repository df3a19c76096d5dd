use std::sync::Arc;

use attendance_backend::{
    models::{participant::Participant, session::SessionDefinition},
    services::{
        memory_store::InMemoryAttendanceStore,
        registration_service::StaticRegistrationDirectory,
        session_catalog::StaticSessionCatalog,
    },
    AppState, StateSettings,
};
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

fn session(id: &str, day: &str, scheduled: bool) -> SessionDefinition {
    SessionDefinition {
        session_id: id.to_string(),
        day: day.to_string(),
        day_position: 1,
        title: format!("Session {}", id),
        scheduled_time: None,
        requires_attendance: true,
        is_scheduled: scheduled,
        position: 0,
    }
}

fn setup_app() -> Router {
    let catalog = StaticSessionCatalog::new(vec![
        session("S1", "Day 1", true),
        session("S2", "Day 2", true),
        session("CANCELLED", "Day 2", false),
    ])
    .expect("catalog");
    let registry = StaticRegistrationDirectory::new(vec![Participant {
        participant_id: "P-100".into(),
        full_name: Some("Katherine Johnson".into()),
        email: Some("kj@example.com".into()),
        affiliation: Some("Langley".into()),
    }]);
    let state = AppState::from_parts(
        Arc::new(InMemoryAttendanceStore::new()),
        Arc::new(catalog),
        Arc::new(registry),
        StateSettings::default(),
    );

    Router::new()
        .route(
            "/api/scan",
            post(attendance_backend::routes::scan::record_scan),
        )
        .route(
            "/api/attendance/participants/:participant_id",
            get(attendance_backend::routes::attendance::participant_attendance),
        )
        .with_state(state)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, JsonValue) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null);
    (status, body)
}

fn scan_request(body: JsonValue) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/scan")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn scan(app: &Router, participant: &str, session: &str, kind: &str) -> (StatusCode, JsonValue) {
    send(
        app,
        scan_request(json!({
            "participantId": participant,
            "sessionId": session,
            "scanKind": kind,
        })),
    )
    .await
}

#[tokio::test]
async fn entry_then_exit_merges_into_one_record() {
    let app = setup_app();

    let (status, first) = scan(&app, "P-100", "S1", "entry").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["state"], "checked_in");
    assert!(first["checkOutTime"].is_null());
    assert_eq!(first["participantName"], "Katherine Johnson");
    assert_eq!(first["sessionTitle"], "Session S1");

    let (status, second) = scan(&app, "P-100", "S1", "exit").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["recordId"], first["recordId"]);
    assert_eq!(second["checkInTime"], first["checkInTime"]);
    assert!(second["checkOutTime"].is_string());
    assert_eq!(second["isComplete"], true);
}

#[tokio::test]
async fn exit_first_is_a_valid_partial_record() {
    let app = setup_app();

    let (status, body) = scan(&app, "P-100", "S2", "exit").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "checked_out");
    assert!(body["checkInTime"].is_null());

    let (_, merged) = scan(&app, "P-100", "S2", "entry").await;
    assert_eq!(merged["checkOutTime"], body["checkOutTime"]);
    assert_eq!(merged["isComplete"], true);
}

#[tokio::test]
async fn repeated_scan_is_idempotent() {
    let app = setup_app();

    let (_, first) = scan(&app, "P-100", "S1", "entry").await;
    let (status, again) = scan(&app, "P-100", "S1", "entry").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["recordId"], first["recordId"]);
    assert!(again["checkOutTime"].is_null());
    let before: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(first["checkInTime"].clone()).unwrap();
    let after: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(again["checkInTime"].clone()).unwrap();
    assert!(after >= before);

    let req = Request::builder()
        .uri("/api/attendance/participants/P-100")
        .body(Body::empty())
        .unwrap();
    let (_, view) = send(&app, req).await;
    assert_eq!(view["records"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn snake_case_aliases_are_accepted() {
    let app = setup_app();

    let (status, body) = send(
        &app,
        scan_request(json!({
            "participant_id": "P-100",
            "session_id": "S1",
            "scan_kind": "check_out",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "checked_out");
}

#[tokio::test]
async fn rejects_malformed_participant() {
    let app = setup_app();

    let (status, body) = scan(&app, "P 100; drop", "S1", "entry").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation_error");
    assert_eq!(body["retryable"], false);

    let (status, _) = scan(&app, "", "S1", "entry").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rejects_missing_or_unknown_scan_kind() {
    let app = setup_app();

    let (status, body) = send(
        &app,
        scan_request(json!({ "participantId": "P-100", "sessionId": "S1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation_error");
    assert_eq!(body["retryable"], false);

    let (status, body) = scan(&app, "P-100", "S1", "sideways").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation_error");
}

#[tokio::test]
async fn rejects_body_that_is_not_json() {
    let app = setup_app();

    let req = Request::builder()
        .method("POST")
        .uri("/api/scan")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation_error");
}

#[tokio::test]
async fn unknown_or_unscheduled_session_is_not_found() {
    let app = setup_app();

    let (status, body) = scan(&app, "P-100", "S9", "entry").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");

    let (status, _) = scan(&app, "P-100", "CANCELLED", "entry").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn claimed_fields_fill_blanks_but_never_erase() {
    let app = setup_app();

    let (_, first) = send(
        &app,
        scan_request(json!({
            "participantId": "WALK-IN-7",
            "sessionId": "S1",
            "scanKind": "entry",
            "fullName": "Dorothy Vaughan",
        })),
    )
    .await;
    assert_eq!(first["participantName"], "Dorothy Vaughan");

    let (_, second) = send(
        &app,
        scan_request(json!({
            "participantId": "WALK-IN-7",
            "sessionId": "S1",
            "scanKind": "exit",
            "fullName": "",
            "affiliation": "West Computing",
        })),
    )
    .await;
    assert_eq!(second["participantName"], "Dorothy Vaughan");
    assert_eq!(second["participantAffiliation"], "West Computing");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_entry_and_exit_both_land() {
    let app = setup_app();

    let mut handles = Vec::new();
    for i in 0..40 {
        let app = app.clone();
        let kind = if i % 2 == 0 { "entry" } else { "exit" };
        handles.push(tokio::spawn(async move {
            scan(&app, "P-100", "S2", kind).await.0
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }

    let req = Request::builder()
        .uri("/api/attendance/participants/P-100")
        .body(Body::empty())
        .unwrap();
    let (_, view) = send(&app, req).await;
    let records = view["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["isComplete"], true);
}
