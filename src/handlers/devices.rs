use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Deserializer, de};

use crate::db::{AppState, queries};
use crate::error::{AppError, Result, msg};
use crate::extractors::{Json, Path, Query};
use crate::models::{
    CreateDevice, Device, DeviceFilter, DeviceState, StateDescription, UpdateDevice,
    state_descriptions,
};
use crate::pagination::{Page, PageRequest};

/// Query parameters for GET /devices
#[derive(Debug, Default, Deserialize)]
pub struct ListDevicesQuery {
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "deserialize_empty_as_none")]
    pub state: Option<DeviceState>,
    pub page: Option<u32>,
    pub size: Option<u32>,
    /// `field[,direction]`, e.g. `name,desc`
    pub sort: Option<String>,
}

/// An empty `state=` means no state filter; any other unknown value is rejected.
fn deserialize_empty_as_none<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DeviceState>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.is_empty() => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("unknown device state `{}`", raw))),
    }
}

/// POST /devices
pub async fn create_device(
    State(state): State<AppState>,
    Json(input): Json<CreateDevice>,
) -> Result<(StatusCode, Json<Device>)> {
    input.validate()?;

    let conn = state.db.get()?;
    let device = queries::create_device(&conn, &input)?;
    tracing::info!(device_id = device.id, brand = %device.brand, "Device created");

    Ok((StatusCode::CREATED, Json(device)))
}

/// GET /devices/{id}
pub async fn get_device(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Device>> {
    tracing::debug!(device_id = id, "Fetching device");

    let conn = state.db.get()?;
    let device = queries::get_device_by_id(&conn, id)?
        .ok_or_else(|| AppError::NotFound(msg::device_not_found(id)))?;

    Ok(Json(device))
}

/// GET /devices - optionally filtered by brand or state (brand wins if both are given)
pub async fn list_devices(
    State(state): State<AppState>,
    Query(query): Query<ListDevicesQuery>,
) -> Result<Json<Page<Device>>> {
    let request = PageRequest::from_params(query.page, query.size, query.sort.as_deref())?;
    let filter = DeviceFilter::from_params(query.brand, query.state);
    tracing::debug!(
        ?filter,
        page = request.page,
        size = request.size,
        "Listing devices"
    );

    let conn = state.db.get()?;
    let (devices, total) = queries::list_devices_paginated(&conn, &filter, &request)?;

    Ok(Json(Page::new(devices, total, &request)))
}

/// PATCH /devices/{id} - partial update; absent keys are left unchanged
pub async fn update_device(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateDevice>,
) -> Result<Json<Device>> {
    let changes = input.into_change_set()?;

    let mut conn = state.db.get()?;
    let device = queries::update_device_guarded(&mut conn, id, &changes).inspect_err(|e| {
        if let AppError::Lifecycle(violation) = e {
            tracing::info!(device_id = id, %violation, "Device update rejected");
        }
    })?;
    tracing::info!(device_id = id, state = device.state.as_ref(), "Device updated");

    Ok(Json(device))
}

/// DELETE /devices/{id} - refused while the device is IN_USE
pub async fn delete_device(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    let mut conn = state.db.get()?;
    queries::delete_device_guarded(&mut conn, id).inspect_err(|e| {
        if let AppError::Lifecycle(violation) = e {
            tracing::info!(device_id = id, %violation, "Device delete rejected");
        }
    })?;
    tracing::info!(device_id = id, "Device deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /device-states
pub async fn list_device_states() -> Json<Vec<StateDescription>> {
    Json(state_descriptions())
}
