//! End-to-end HTTP tests over the in-memory document store

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use ambulance_core::{Ambulance, DocumentStore, MemoryDocumentStore};
use ambulance_server::{build_router, AppState, ServerConfig};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
}

async fn app() -> Router {
    let store = Arc::new(MemoryDocumentStore::<Ambulance>::new());
    store
        .create("A1", &Ambulance::new("A1", "Ambulance 1"))
        .await
        .unwrap();
    let state = AppState::with_clock(store, Arc::new(now));
    build_router(state, &ServerConfig::default())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_is_ok() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "connected");
}

#[tokio::test]
async fn create_conflict_delete_roundtrip() {
    let app = app().await;
    let entries = "/api/waiting-list/A1/entries";

    let (status, created) = send(&app, "POST", entries, Some(json!({"patientId": "P1"}))).await;
    assert_eq!(status, StatusCode::OK);
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(created["estimatedDurationMinutes"], 15);
    let since: DateTime<Utc> = created["waitingSince"].as_str().unwrap().parse().unwrap();
    assert_eq!(since, now());

    let (status, body) = send(&app, "POST", entries, Some(json!({"patientId": "P1"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
    assert_eq!(body["status"], 409);

    let (status, body) = send(&app, "DELETE", &format!("{}/{}", entries, id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, "GET", entries, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn missing_entry_is_404() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/api/waiting-list/A1/entries/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = send(&app, "DELETE", "/api/waiting-list/A1/entries/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_ambulance_is_404() {
    let app = app().await;
    let (status, _) = send(&app, "GET", "/api/waiting-list/nope/entries", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_bodies_are_400() {
    let app = app().await;
    let entries = "/api/waiting-list/A1/entries";

    let (status, body) = send(&app, "POST", entries, Some(json!({"name": "No Patient"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "patientId cannot be empty");

    let (status, body) = send(
        &app,
        "POST",
        entries,
        Some(json!({"patientId": "P1", "estimatedDurationMinutes": "soon"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn put_patches_only_supplied_fields() {
    let app = app().await;
    let entries = "/api/waiting-list/A1/entries";
    let (_, created) = send(
        &app,
        "POST",
        entries,
        Some(json!({"patientId": "P1", "estimatedDurationMinutes": 25})),
    )
    .await;
    let uri = format!("{}/{}", entries, created["id"].as_str().unwrap());

    let (status, updated) = send(&app, "PUT", &uri, Some(json!({"patientId": "P2"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["patientId"], "P2");
    assert_eq!(updated["estimatedDurationMinutes"], 25);

    let (status, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn ambulance_provisioning() {
    let app = app().await;

    let (status, created) = send(
        &app,
        "POST",
        "/api/ambulance",
        Some(json!({"id": "A2", "name": "Ambulance 2", "roomNumber": "101"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["waitingList"], json!([]));

    let (status, _) = send(
        &app,
        "POST",
        "/api/ambulance",
        Some(json!({"id": "A2", "name": "Again"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, fetched) = send(&app, "GET", "/api/ambulance/A2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["roomNumber"], "101");

    let (status, _) = send(&app, "DELETE", "/api/ambulance/A2", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", "/api/ambulance/A2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
