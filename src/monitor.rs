use std::sync::Arc;
use std::time::Duration;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::model::*;
use crate::resolver::{Resolver, ResolverError, free_rooms, fully_occupied_dates};
use crate::store::{Entity, WalRepository};

/// One pass of the occupancy monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyReport {
    pub window: DateRange,
    pub fully_occupied: Vec<NaiveDate>,
    pub free_tomorrow: Vec<RoomId>,
}

/// Scan `[tomorrow, tomorrow + horizon_days]` for fully occupied dates and
/// count tomorrow's free rooms. Both figures come from one read of the
/// stores. Updates the occupancy gauges.
pub async fn scan_occupancy(resolver: &Resolver, horizon_days: u64) -> Result<OccupancyReport, ResolverError> {
    let out_of_range = || ResolverError::InvalidArgument("monitor window out of calendar range".into());
    let tomorrow = resolver.today().succ_opt().ok_or_else(out_of_range)?;
    let last = tomorrow
        .checked_add_days(Days::new(horizon_days))
        .ok_or_else(out_of_range)?;

    let window = resolver.scan_window(tomorrow, last)?;
    let (rooms, bookings) = resolver.load().await?;
    let fully_occupied = fully_occupied_dates(&rooms, &bookings, &window);
    let free_tomorrow = free_rooms(&rooms, &bookings, &DateRange::single_day(tomorrow));

    metrics::gauge!(crate::observability::FULLY_OCCUPIED_DATES).set(fully_occupied.len() as f64);
    metrics::gauge!(crate::observability::FREE_ROOMS).set(free_tomorrow.len() as f64);

    Ok(OccupancyReport {
        window,
        fully_occupied,
        free_tomorrow,
    })
}

/// Background task that periodically logs occupancy over the coming horizon.
pub async fn run_occupancy_monitor(resolver: Arc<Resolver>, horizon_days: u64, period: Duration) {
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        match scan_occupancy(&resolver, horizon_days).await {
            Ok(report) => {
                info!(
                    "{} rooms free tomorrow, {} fully occupied dates in {}..={}",
                    report.free_tomorrow.len(),
                    report.fully_occupied.len(),
                    report.window.start,
                    report.window.end
                );
                if let Some(first) = report.fully_occupied.first() {
                    info!("next fully occupied date: {first}");
                }
            }
            Err(e) => warn!("occupancy scan failed: {e}"),
        }
    }
}

/// Background task that compacts a WAL-backed repository once enough
/// appends have accumulated since the last compaction.
pub async fn run_compactor<T>(repo: Arc<WalRepository<T>>, threshold: u64, period: Duration)
where
    T: Entity + Serialize + DeserializeOwned,
{
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        let appends = repo.appends_since_compact().await;
        if appends < threshold {
            continue;
        }
        match repo.compact().await {
            Ok(()) => info!("compacted {} after {appends} appends", repo.path().display()),
            Err(e) => warn!("compaction of {} failed: {e}", repo.path().display()),
        }
        debug!("{} appends since compact", repo.appends_since_compact().await);
    }
}
