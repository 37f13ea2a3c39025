mod devices;

pub use devices::*;

use axum::{
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::db::AppState;

/// Prefix shared by every device endpoint
pub const API_BASE: &str = "/device-service/v1";

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router() -> Router<AppState> {
    let devices = Router::new()
        .route("/devices", get(list_devices).post(create_device))
        .route(
            "/devices/{id}",
            get(get_device).patch(update_device).delete(delete_device),
        )
        .route("/device-states", get(list_device_states));

    Router::new()
        .route("/health", get(health))
        .nest(API_BASE, devices)
}
