//! Prometheus metrics for the health probes.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// Liveness requests counter metric name.
pub const METRIC_HEALTH_REQUESTS: &str = "health_requests_total";
/// Readiness requests counter metric name.
pub const METRIC_READY_REQUESTS: &str = "ready_requests_total";
/// Dependency ping requests counter metric name.
pub const METRIC_DB_PING_REQUESTS: &str = "db_ping_requests_total";
/// Dependency ping failures counter metric name.
pub const METRIC_DB_PING_FAILURES: &str = "db_ping_failures_total";
/// Dependency ping latency metric name.
pub const METRIC_DB_PING_LATENCY: &str = "db_ping_latency_ms";

/// Install the Prometheus recorder and register metric descriptions.
/// Call this once at startup; the returned handle renders `/metrics`.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_counter!(METRIC_HEALTH_REQUESTS, "Total number of /health requests");
    describe_counter!(METRIC_READY_REQUESTS, "Total number of /ready requests");
    describe_counter!(
        METRIC_DB_PING_REQUESTS,
        "Total number of /db/ping requests"
    );
    describe_counter!(
        METRIC_DB_PING_FAILURES,
        "Total number of failed database pings"
    );
    describe_histogram!(
        METRIC_DB_PING_LATENCY,
        "Database ping round-trip latency in milliseconds"
    );

    debug!("Metrics recorder installed");
    Ok(handle)
}

/// Increment the liveness request counter.
pub fn inc_health_requests() {
    counter!(METRIC_HEALTH_REQUESTS).increment(1);
}

/// Increment the readiness request counter.
pub fn inc_ready_requests() {
    counter!(METRIC_READY_REQUESTS).increment(1);
}

/// Increment the dependency ping request counter.
pub fn inc_db_ping_requests() {
    counter!(METRIC_DB_PING_REQUESTS).increment(1);
}

/// Increment the dependency ping failure counter.
pub fn inc_db_ping_failures() {
    counter!(METRIC_DB_PING_FAILURES).increment(1);
}

/// Record dependency ping round-trip latency.
pub fn record_db_ping_latency(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_DB_PING_LATENCY).record(latency_ms);
}
