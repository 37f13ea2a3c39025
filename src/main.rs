use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use devices_api::config::Config;
use devices_api::db::{create_pool, init_db, queries, AppState};
use devices_api::handlers;
use devices_api::models::{ChangeSet, CreateDevice, DeviceState};

#[derive(Parser, Debug)]
#[command(name = "devices-api")]
#[command(about = "Device inventory service with lifecycle-guarded updates")]
struct Cli {
    /// Seed an empty database with sample devices (dev mode only)
    #[arg(long)]
    seed: bool,

    /// Delete the database on exit (dev mode only, useful for fresh starts)
    #[arg(long)]
    ephemeral: bool,
}

/// Inserts a handful of devices covering every state.
/// Only runs in dev mode and when the store is empty.
fn seed_dev_data(state: &AppState) -> devices_api::error::Result<()> {
    let mut conn = state.db.get()?;

    if queries::count_devices(&conn)? > 0 {
        tracing::info!("Database already has devices, skipping seed");
        return Ok(());
    }

    let samples = [
        ("iPhone 15", "Apple", DeviceState::InUse),
        ("MacBook Pro", "Apple", DeviceState::Available),
        ("Galaxy S24", "Samsung", DeviceState::Available),
        ("Pixel 8", "Google", DeviceState::Inactive),
        ("ThinkPad X1", "Lenovo", DeviceState::InUse),
    ];

    for (name, brand, target) in samples {
        let device = queries::create_device(
            &conn,
            &CreateDevice {
                name: name.to_string(),
                brand: brand.to_string(),
            },
        )?;
        if target != device.state {
            queries::update_device_guarded(&mut conn, device.id, &ChangeSet::default().state(target))?;
        }
        tracing::info!("Seeded device {} ({} {}) as {}", device.id, brand, name, target.as_ref());
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devices_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    if config.dev_mode {
        tracing::info!("Running in DEVELOPMENT mode");
    }

    let db_pool = create_pool(&config.database_path, config.db_pool_size)
        .expect("Failed to create database pool");
    {
        let conn = db_pool.get().expect("Failed to get connection");
        init_db(&conn).expect("Failed to initialize database");
    }

    let state = AppState { db: db_pool };

    if cli.seed {
        if !config.dev_mode {
            tracing::warn!("--seed flag ignored: not in dev mode (set DEVICES_ENV=dev)");
        } else if let Err(e) = seed_dev_data(&state) {
            tracing::error!("Failed to seed dev data: {}", e);
        }
    }

    let app = handlers::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    let cleanup_on_exit = cli.ephemeral && config.dev_mode;
    if cli.ephemeral && !config.dev_mode {
        tracing::warn!("--ephemeral flag ignored: not in dev mode (set DEVICES_ENV=dev)");
    }
    if cleanup_on_exit {
        tracing::info!("EPHEMERAL MODE: database will be deleted on exit");
    }

    tracing::info!("Devices API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");

    if cleanup_on_exit {
        let db_path = &config.database_path;
        match std::fs::remove_file(db_path) {
            Ok(()) => tracing::info!("Removed {}", db_path),
            Err(e) => tracing::warn!("Failed to remove {}: {}", db_path, e),
        }
        let _ = std::fs::remove_file(format!("{}-journal", db_path));
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}
