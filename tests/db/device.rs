//! Database device operation tests

#[path = "../common/mod.rs"]
mod common;

use common::*;

// ============ Device Creation Tests ============

#[test]
fn test_create_device() {
    let conn = setup_test_db();

    let device = create_test_device(&conn, "iPhone 15", "Apple");

    assert!(device.id > 0);
    assert_eq!(device.name, "iPhone 15");
    assert_eq!(device.brand, "Apple");
    assert_eq!(device.state, DeviceState::Available);
}

#[test]
fn test_create_device_assigns_increasing_ids() {
    let conn = setup_test_db();

    let first = create_test_device(&conn, "A", "Brand");
    let second = create_test_device(&conn, "B", "Brand");

    assert!(second.id > first.id);
}

#[test]
fn test_created_device_matches_stored_row() {
    let conn = setup_test_db();
    let created = create_test_device(&conn, "Galaxy S24", "Samsung");

    let fetched = queries::get_device_by_id(&conn, created.id)
        .expect("Query failed")
        .expect("Device not found");

    assert_eq!(fetched, created);
}

// ============ Device Lookup Tests ============

#[test]
fn test_get_device_by_id_missing() {
    let conn = setup_test_db();

    let result = queries::get_device_by_id(&conn, 999).expect("Query failed");

    assert!(result.is_none());
}

#[test]
fn test_count_devices() {
    let conn = setup_test_db();
    assert_eq!(queries::count_devices(&conn).unwrap(), 0);

    create_test_device(&conn, "A", "Apple");
    create_test_device(&conn, "B", "Apple");

    assert_eq!(queries::count_devices(&conn).unwrap(), 2);
}

// ============ Save Tests ============

#[test]
fn test_save_device_persists_mutable_fields() {
    let conn = setup_test_db();
    let mut device = create_test_device(&conn, "Pixel 8", "Google");

    device.name = "Pixel 8 Pro".to_string();
    device.state = DeviceState::Inactive;
    let saved = queries::save_device(&conn, &device)
        .expect("Save failed")
        .expect("Device not found");

    assert_eq!(saved.name, "Pixel 8 Pro");
    assert_eq!(saved.state, DeviceState::Inactive);
    assert_eq!(saved.creation_time, device.creation_time);
}

#[test]
fn test_save_device_never_rewrites_creation_time() {
    let conn = setup_test_db();
    let original = create_test_device(&conn, "Pixel 8", "Google");

    let mut tampered = original.clone();
    tampered.creation_time = chrono::Utc::now() + chrono::Duration::days(30);
    let saved = queries::save_device(&conn, &tampered).unwrap().unwrap();

    assert_eq!(saved.creation_time, original.creation_time);
}

#[test]
fn test_save_missing_device_returns_none() {
    let conn = setup_test_db();
    let mut device = create_test_device(&conn, "Ghost", "Nobody");
    queries::delete_device(&conn, device.id).unwrap();

    device.name = "Still a ghost".to_string();
    let result = queries::save_device(&conn, &device).expect("Save failed");

    assert!(result.is_none());
}

// ============ Delete Tests ============

#[test]
fn test_delete_device() {
    let conn = setup_test_db();
    let device = create_test_device(&conn, "Old Phone", "Nokia");

    assert!(queries::delete_device(&conn, device.id).unwrap());
    assert!(queries::get_device_by_id(&conn, device.id).unwrap().is_none());
}

#[test]
fn test_delete_missing_device_returns_false() {
    let conn = setup_test_db();

    assert!(!queries::delete_device(&conn, 12345).unwrap());
}

#[test]
fn test_schema_rejects_unknown_state() {
    let conn = setup_test_db();

    let result = conn.execute(
        "INSERT INTO devices (name, brand, state, creation_time) VALUES ('x', 'y', 'BROKEN', 0)",
        [],
    );

    assert!(result.is_err(), "CHECK constraint should reject unknown state");
}
