use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::{Connection, ToSql, TransactionBehavior, params};

use crate::error::{AppError, Result, msg};
use crate::lifecycle;
use crate::models::*;
use crate::pagination::{PageRequest, SortField};

use super::from_row::{DEVICE_COLS, query_all, query_one};

/// Current time at the precision the store keeps, so a freshly created device
/// compares equal to the same row read back.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

// ============ Devices ============

/// Insert a new device. It always starts AVAILABLE; the id and creation time
/// are assigned here.
pub fn create_device(conn: &Connection, input: &CreateDevice) -> Result<Device> {
    let now = now();
    let state = DeviceState::Available;

    conn.execute(
        "INSERT INTO devices (name, brand, state, creation_time) VALUES (?1, ?2, ?3, ?4)",
        params![&input.name, &input.brand, state.as_ref(), now.timestamp_millis()],
    )?;

    Ok(Device {
        id: conn.last_insert_rowid(),
        name: input.name.clone(),
        brand: input.brand.clone(),
        state,
        creation_time: now,
    })
}

pub fn get_device_by_id(conn: &Connection, id: i64) -> Result<Option<Device>> {
    query_one(
        conn,
        &format!("SELECT {} FROM devices WHERE id = ?1", DEVICE_COLS),
        &[&id],
    )
}

pub fn count_devices(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM devices", [], |row| row.get(0))?;
    Ok(count)
}

/// List one page of devices matching the filter. Returns the page and the
/// total number of matching devices, both read from the same snapshot.
pub fn list_devices_paginated(
    conn: &Connection,
    filter: &DeviceFilter,
    page: &PageRequest,
) -> Result<(Vec<Device>, i64)> {
    let (where_clause, filter_value): (&str, Option<String>) = match filter {
        DeviceFilter::All => ("", None),
        DeviceFilter::Brand(brand) => ("WHERE brand = ?", Some(brand.clone())),
        DeviceFilter::State(state) => ("WHERE state = ?", Some(state.as_ref().to_string())),
    };

    let limit = page.limit();
    let offset = page.offset();

    let mut params: Vec<&dyn ToSql> = Vec::new();
    if let Some(ref value) = filter_value {
        params.push(value);
    }

    let tx = conn.unchecked_transaction()?;

    let total: i64 = tx.query_row(
        &format!("SELECT COUNT(*) FROM devices {}", where_clause),
        params.as_slice(),
        |row| row.get(0),
    )?;

    // Column names come from SortField, never from raw input
    let mut order_by = format!("{} {}", page.sort.field.column(), page.sort.direction.as_sql());
    if page.sort.field != SortField::Id {
        order_by.push_str(", id ASC");
    }

    params.push(&limit);
    params.push(&offset);

    let devices = query_all(
        &tx,
        &format!(
            "SELECT {} FROM devices {} ORDER BY {} LIMIT ? OFFSET ?",
            DEVICE_COLS, where_clause, order_by
        ),
        &params,
    )?;
    tx.commit()?;

    Ok((devices, total))
}

/// Persist the mutable fields of a device. Returns None if the row no longer exists.
/// Creation time is never written back.
pub fn save_device(conn: &Connection, device: &Device) -> Result<Option<Device>> {
    let state: &str = device.state.as_ref();
    query_one(
        conn,
        &format!(
            "UPDATE devices SET name = ?1, brand = ?2, state = ?3 WHERE id = ?4 RETURNING {}",
            DEVICE_COLS
        ),
        &[&device.name, &device.brand, &state, &device.id],
    )
}

pub fn delete_device(conn: &Connection, id: i64) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM devices WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

/// Load, check, merge and persist a partial update as one unit.
///
/// Runs in an IMMEDIATE transaction so a concurrent update to the same device
/// is validated against whatever this one commits. A rejected change-set
/// leaves the row untouched.
pub fn update_device_guarded(conn: &mut Connection, id: i64, changes: &ChangeSet) -> Result<Device> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let mut device = get_device_by_id(&tx, id)?
        .ok_or_else(|| AppError::NotFound(msg::device_not_found(id)))?;

    lifecycle::validate_update(&device, changes)?;
    lifecycle::apply_change_set(&mut device, changes);

    let saved = save_device(&tx, &device)?
        .ok_or_else(|| AppError::NotFound(msg::device_not_found(id)))?;

    tx.commit()?;
    Ok(saved)
}

/// Delete a device unless it is IN_USE, checked and removed in one transaction.
pub fn delete_device_guarded(conn: &mut Connection, id: i64) -> Result<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let device = get_device_by_id(&tx, id)?
        .ok_or_else(|| AppError::NotFound(msg::device_not_found(id)))?;

    lifecycle::validate_delete(&device)?;

    if !delete_device(&tx, id)? {
        return Err(AppError::NotFound(msg::device_not_found(id)));
    }

    tx.commit()?;
    Ok(())
}
