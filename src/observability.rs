use std::net::SocketAddr;
use std::time::Instant;

use crate::resolver::ResolverError;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: resolver operations executed. Labels: operation, status.
pub const QUERIES_TOTAL: &str = "roomcheck_queries_total";

/// Histogram: resolver operation latency in seconds. Labels: operation.
pub const QUERY_DURATION_SECONDS: &str = "roomcheck_query_duration_seconds";

/// Counter: bookings inserted by the resolver.
pub const BOOKINGS_CREATED_TOTAL: &str = "roomcheck_bookings_created_total";

/// Counter: booking requests turned away because no room was free.
pub const BOOKINGS_REJECTED_TOTAL: &str = "roomcheck_bookings_rejected_total";

// ── Occupancy gauges (monitor-driven) ───────────────────────────

/// Gauge: fully occupied dates inside the monitor horizon.
pub const FULLY_OCCUPIED_DATES: &str = "roomcheck_fully_occupied_dates";

/// Gauge: rooms free for tomorrow.
pub const FREE_ROOMS: &str = "roomcheck_free_rooms";

// ── Storage ─────────────────────────────────────────────────────

/// Counter: records appended to any WAL-backed repository.
pub const WAL_APPENDS_TOTAL: &str = "roomcheck_wal_appends_total";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(port) = port else { return Ok(()) };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
    Ok(())
}

/// Map a resolver outcome to a short status label for metrics.
pub fn status_label<T>(result: &Result<T, ResolverError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(ResolverError::InvalidArgument(_)) => "invalid_argument",
        Err(ResolverError::Store(_)) => "store_error",
    }
}

/// Record count + latency for one resolver operation.
pub fn record_query<T>(operation: &'static str, result: &Result<T, ResolverError>, started: Instant) {
    metrics::counter!(QUERIES_TOTAL, "operation" => operation, "status" => status_label(result))
        .increment(1);
    metrics::histogram!(QUERY_DURATION_SECONDS, "operation" => operation)
        .record(started.elapsed().as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[test]
    fn status_labels() {
        let ok: Result<i32, ResolverError> = Ok(1);
        let invalid: Result<i32, ResolverError> =
            Err(ResolverError::InvalidArgument("start in the past".into()));
        let store: Result<i32, ResolverError> =
            Err(ResolverError::Store(StoreError::WalError("disk full".into())));
        assert_eq!(status_label(&ok), "ok");
        assert_eq!(status_label(&invalid), "invalid_argument");
        assert_eq!(status_label(&store), "store_error");
    }

    #[test]
    fn init_without_port_is_noop() {
        assert!(init(None).is_ok());
    }
}
