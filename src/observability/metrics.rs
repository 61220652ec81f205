//! Metrics collection and exposition.
//!
//! # Metrics
//! - `zonekeeper_registered_services` (gauge): current registry size
//! - `zonekeeper_registrations_total` (counter): accepted registrations
//! - `zonekeeper_probe_failures_total` (counter): failed probe verdicts
//! - `zonekeeper_evictions_total` (counter): records pruned at threshold
//! - `zonekeeper_zone_publishes_total` (counter, by outcome): zone writes
//! - `zonekeeper_reconcile_duration_seconds` (histogram): tick duration

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`. Failure is logged, not fatal;
/// the service runs fine without metrics exposition.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(%addr, "Prometheus metrics exporter started"),
        Err(error) => tracing::error!(%error, "failed to install metrics exporter"),
    }
}

/// Record the current registry size.
pub fn record_registry_size(count: usize) {
    gauge!("zonekeeper_registered_services").set(count as f64);
}

/// Record one accepted registration.
pub fn record_registration() {
    counter!("zonekeeper_registrations_total").increment(1);
}

/// Record the failed verdicts of one probing pass.
pub fn record_probe_failures(count: usize) {
    if count > 0 {
        counter!("zonekeeper_probe_failures_total").increment(count as u64);
    }
}

/// Record records evicted in one reconciliation pass.
pub fn record_evictions(count: usize) {
    if count > 0 {
        counter!("zonekeeper_evictions_total").increment(count as u64);
    }
}

/// Record a zone publish attempt.
pub fn record_zone_publish(success: bool) {
    let outcome = if success { "success" } else { "error" };
    counter!("zonekeeper_zone_publishes_total", "outcome" => outcome).increment(1);
}

/// Record the duration of one reconciliation tick.
pub fn record_reconcile_duration(start: Instant) {
    histogram!("zonekeeper_reconcile_duration_seconds").record(start.elapsed().as_secs_f64());
}
