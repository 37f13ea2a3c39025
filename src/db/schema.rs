use rusqlite::Connection;

/// Initialize the device schema
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        -- Devices (sole entity; ids are assigned in insertion order)
        -- creation_time: unix epoch milliseconds, written once on insert
        CREATE TABLE IF NOT EXISTS devices (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            brand TEXT NOT NULL,
            state TEXT NOT NULL CHECK (state IN ('AVAILABLE', 'IN_USE', 'INACTIVE')),
            creation_time INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_devices_brand ON devices(brand);
        CREATE INDEX IF NOT EXISTS idx_devices_state ON devices(state);
        "#,
    )
}
