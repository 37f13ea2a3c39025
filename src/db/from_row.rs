//! Row mapping for device queries.

use chrono::DateTime;
use rusqlite::{Connection, OptionalExtension, Row, ToSql};

use crate::models::Device;

/// Parse a string column into an enum type, converting parse errors to rusqlite errors.
fn parse_enum<T: std::str::FromStr>(row: &Row, col: usize, col_name: &str) -> rusqlite::Result<T> {
    row.get::<_, String>(col)?.parse::<T>().map_err(|_| {
        rusqlite::Error::InvalidColumnType(col, col_name.to_string(), rusqlite::types::Type::Text)
    })
}

/// Trait for constructing a type from a database row.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

/// Query for a single optional result.
pub fn query_one<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Option<T>> {
    conn.query_row(sql, params, T::from_row)
        .optional()
        .map_err(Into::into)
}

/// Query for multiple results.
pub fn query_all<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, T::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub const DEVICE_COLS: &str = "id, name, brand, state, creation_time";

impl FromRow for Device {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let millis: i64 = row.get(4)?;
        let creation_time = DateTime::from_timestamp_millis(millis).ok_or_else(|| {
            rusqlite::Error::InvalidColumnType(
                4,
                "creation_time".to_string(),
                rusqlite::types::Type::Integer,
            )
        })?;
        Ok(Device {
            id: row.get(0)?,
            name: row.get(1)?,
            brand: row.get(2)?,
            state: parse_enum(row, 3, "state")?,
            creation_time,
        })
    }
}
