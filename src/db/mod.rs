mod from_row;
mod schema;
pub mod queries;

pub use schema::init_db;

use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Device database pool
    pub db: DbPool,
}

pub fn create_pool(database_path: &str, max_size: u32) -> Result<DbPool, r2d2::Error> {
    // Writers queue on the IMMEDIATE lock instead of failing straight away
    let manager = SqliteConnectionManager::file(database_path)
        .with_init(|conn| conn.busy_timeout(Duration::from_secs(5)));
    Pool::builder().max_size(max_size).build(manager)
}
