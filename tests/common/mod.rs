//! Test utilities and fixtures for Devices API integration tests

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use serde_json::Value;
use tower::ServiceExt;

pub use devices_api::db::{AppState, init_db, queries};
pub use devices_api::models::*;
pub use devices_api::pagination::PageRequest;

/// Create an in-memory test database with schema initialized
pub fn setup_test_db() -> Connection {
    let conn = Connection::open_in_memory().expect("Failed to create in-memory database");
    init_db(&conn).expect("Failed to initialize schema");
    conn
}

/// Create app state over a single-connection in-memory pool.
/// Every in-memory connection is its own database, so the pool holds exactly one.
pub fn test_state() -> AppState {
    let manager = SqliteConnectionManager::memory();
    let pool = Pool::builder().max_size(1).build(manager).unwrap();
    {
        let conn = pool.get().unwrap();
        init_db(&conn).unwrap();
    }
    AppState { db: pool }
}

/// Router plus the state behind it, for seeding and inspecting the store
pub fn test_app() -> (Router, AppState) {
    let state = test_state();
    let app = devices_api::handlers::router().with_state(state.clone());
    (app, state)
}

/// Create a test device (always starts AVAILABLE)
pub fn create_test_device(conn: &Connection, name: &str, brand: &str) -> Device {
    let input = CreateDevice {
        name: name.to_string(),
        brand: brand.to_string(),
    };
    queries::create_device(conn, &input).expect("Failed to create test device")
}

/// Create a test device and move it into the given state
pub fn create_test_device_in_state(
    conn: &Connection,
    name: &str,
    brand: &str,
    state: DeviceState,
) -> Device {
    let mut device = create_test_device(conn, name, brand);
    device.state = state;
    queries::save_device(conn, &device)
        .expect("Failed to set device state")
        .expect("Device vanished while setting state")
}

pub fn devices_url(suffix: &str) -> String {
    format!("{}/devices{}", devices_api::handlers::API_BASE, suffix)
}

/// Send a request with an optional JSON body and return status plus parsed body.
/// Empty bodies come back as `Value::Null`.
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response should be valid JSON")
    };
    (status, json)
}

/// Send a raw string body with a JSON content type
pub async fn send_raw(app: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).expect("Response should be valid JSON");
    (status, json)
}
