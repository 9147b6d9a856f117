use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use roomcheck::model::{Booking, Room};
use roomcheck::monitor;
use roomcheck::resolver::Resolver;
use roomcheck::store::WalRepository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let metrics_port: Option<u16> = std::env::var("ROOMCHECK_METRICS_PORT")
        .ok()
        .and_then(|s| s.parse().ok());
    roomcheck::observability::init(metrics_port)?;

    let data_dir = std::env::var("ROOMCHECK_DATA_DIR").unwrap_or_else(|_| "./data".into());
    let compact_threshold: u64 = std::env::var("ROOMCHECK_COMPACT_THRESHOLD")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(1000);
    let horizon_days: u64 = std::env::var("ROOMCHECK_HORIZON_DAYS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(30);
    let interval_secs: u64 = std::env::var("ROOMCHECK_MONITOR_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(60);
    let seed_path = std::env::var("ROOMCHECK_SEED_ROOMS").ok();

    std::fs::create_dir_all(&data_dir)?;
    let data_dir = PathBuf::from(data_dir);

    let rooms: Arc<WalRepository<Room>> = Arc::new(WalRepository::open(&data_dir.join("rooms.wal"))?);
    let bookings: Arc<WalRepository<Booking>> =
        Arc::new(WalRepository::open(&data_dir.join("bookings.wal"))?);

    if let Some(seed) = &seed_path {
        roomcheck::seed::seed_rooms(rooms.as_ref(), Path::new(seed)).await?;
    }

    let resolver = Arc::new(Resolver::new(bookings.clone(), rooms.clone()));
    let period = Duration::from_secs(interval_secs.max(1));

    info!("roomcheck started");
    info!("  data_dir: {}", data_dir.display());
    info!("  rooms: {}, bookings: {}", rooms.len().await, bookings.len().await);
    info!("  horizon: {horizon_days} days, interval: {}s", period.as_secs());
    info!("  metrics: {}", metrics_port.map_or("disabled".to_string(), |p| format!("http://0.0.0.0:{p}/metrics")));

    let monitor_task = tokio::spawn(monitor::run_occupancy_monitor(resolver, horizon_days, period));
    let room_compactor = tokio::spawn(monitor::run_compactor(rooms, compact_threshold, period));
    let booking_compactor = tokio::spawn(monitor::run_compactor(bookings, compact_threshold, period));

    // Graceful shutdown on SIGTERM/ctrl-c
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
        tokio::select! {
            _ = ctrl_c => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await?;
    }

    info!("shutdown signal received, stopping background tasks");
    monitor_task.abort();
    room_compactor.abort();
    booking_compactor.abort();

    info!("roomcheck stopped");
    Ok(())
}
