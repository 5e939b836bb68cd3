//! HTTP API handlers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::warn;

use crate::db::{Breaker, DbChecker};
use crate::metrics;
use crate::provision::ProvisionedDirs;

/// Endpoint paths advertised by the root index.
pub const ENDPOINTS: [&str; 4] = ["/health", "/ready", "/db/ping", "/metrics"];

/// Application state shared with handlers.
///
/// Everything here is either immutable after startup or an atomic; health
/// checks hold no other shared mutable state and are safe to run
/// concurrently.
#[derive(Clone)]
pub struct AppState {
    /// Whether startup provisioning has completed.
    ready: Arc<AtomicBool>,
    /// Directories provisioned at startup.
    pub dirs: Arc<ProvisionedDirs>,
    /// Dependency checker.
    pub db: DbChecker,
    /// Consecutive-failure breaker for the dependency check.
    pub breaker: Breaker,
    /// Prometheus render handle, when the recorder is installed.
    prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state. Starts not-ready; `set_ready` is called once
    /// startup completes.
    pub fn new(
        dirs: ProvisionedDirs,
        db: DbChecker,
        breaker: Breaker,
        prometheus: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            ready: Arc::new(AtomicBool::new(false)),
            dirs: Arc::new(dirs),
            db,
            breaker,
            prometheus,
        }
    }

    /// Set ready state.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Whether traffic should be routed here: startup complete and the
    /// dependency breaker (if configured) closed.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst) && !self.breaker.is_open()
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
    /// Seconds since the Unix epoch at the time of the check.
    pub ts: i64,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// Whether the service is ready to receive traffic.
    pub ready: bool,
    /// Directories provisioned at startup.
    pub dirs: Vec<String>,
}

/// Dependency ping response.
#[derive(Debug, Serialize)]
pub struct DbPingResponse {
    /// Whether the round trip succeeded.
    pub ok: bool,
    /// Value returned by `SELECT 1` on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<i32>,
    /// Error message on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Root index response.
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    /// Service name.
    pub service: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Advertised endpoint paths.
    pub endpoints: Vec<&'static str>,
}

/// Liveness handler - always returns 200 once the process can respond.
pub async fn health() -> impl IntoResponse {
    metrics::inc_health_requests();
    Json(HealthResponse {
        status: "ok",
        ts: time::OffsetDateTime::now_utc().unix_timestamp(),
    })
}

/// Readiness handler - returns 200 if ready, 503 otherwise.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    metrics::inc_ready_requests();
    let is_ready = state.is_ready();

    let response = ReadyResponse {
        ready: is_ready,
        dirs: vec![
            state.dirs.data.display().to_string(),
            state.dirs.log.display().to_string(),
            state.dirs.cache.display().to_string(),
        ],
    };

    if is_ready {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// Dependency ping handler - one `SELECT 1` round trip.
///
/// Failures become a structured 500 body; they never propagate out of the
/// handler.
pub async fn db_ping(State(state): State<AppState>) -> impl IntoResponse {
    metrics::inc_db_ping_requests();
    let start = Instant::now();

    match state.db.ping().await {
        Ok(value) => {
            metrics::record_db_ping_latency(start);
            state.breaker.record_success();
            (
                StatusCode::OK,
                Json(DbPingResponse {
                    ok: true,
                    select: Some(value),
                    error: None,
                }),
            )
        }
        Err(e) => {
            metrics::inc_db_ping_failures();
            state.breaker.record_failure();
            warn!(error = %e, "database ping failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DbPingResponse {
                    ok: false,
                    select: None,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

/// Root index handler - service name, version, and endpoint listing.
pub async fn index() -> impl IntoResponse {
    Json(IndexResponse {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        endpoints: ENDPOINTS.to_vec(),
    })
}

/// Prometheus scrape handler.
pub async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.prometheus {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::SERVICE_UNAVAILABLE, String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::path::PathBuf;

    fn test_state(config: &Config) -> AppState {
        let dirs = ProvisionedDirs {
            data: PathBuf::from("/tmp/statusd-test/data"),
            log: PathBuf::from("/tmp/statusd-test/logs"),
            cache: PathBuf::from("/tmp/statusd-test/cache"),
        };
        AppState::new(
            dirs,
            DbChecker::from_config(config).unwrap(),
            Breaker::from_config(config),
            None,
        )
    }

    #[test]
    fn app_state_ready_toggle() {
        let state = test_state(&Config::default());
        assert!(!state.is_ready());

        state.set_ready(true);
        assert!(state.is_ready());

        state.set_ready(false);
        assert!(!state.is_ready());
    }

    #[test]
    fn open_breaker_overrides_ready_flag() {
        let config = Config {
            db_breaker_threshold: Some(2),
            ..Config::default()
        };
        let state = test_state(&config);
        state.set_ready(true);
        assert!(state.is_ready());

        state.breaker.record_failure();
        state.breaker.record_failure();
        assert!(!state.is_ready());

        state.breaker.record_success();
        assert!(state.is_ready());
    }

    #[test]
    fn db_ping_response_omits_absent_fields() {
        let ok = serde_json::to_value(DbPingResponse {
            ok: true,
            select: Some(1),
            error: None,
        })
        .unwrap();
        assert_eq!(ok, serde_json::json!({"ok": true, "select": 1}));

        let failed = serde_json::to_value(DbPingResponse {
            ok: false,
            select: None,
            error: Some("connection refused".to_string()),
        })
        .unwrap();
        assert_eq!(
            failed,
            serde_json::json!({"ok": false, "error": "connection refused"})
        );
    }
}
