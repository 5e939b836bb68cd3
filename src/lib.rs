//! Minimal HTTP status daemon.
//!
//! `statusd` does two things at startup and then gets out of the way:
//!
//! 1. Resolves and creates the service's local directories (data, log,
//!    cache), honoring environment overrides and failing fatally before the
//!    listener binds if any directory cannot be created.
//! 2. Serves standardized health probes over HTTP: liveness (`/health`),
//!    readiness (`/ready`), a database round-trip check (`/db/ping`), a
//!    service index (`/`), and Prometheus metrics (`/metrics`).
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`provision`]: Directory resolution and creation
//! - [`db`]: Database dependency checker and circuit breaker
//! - [`api`]: HTTP surface (handlers, routes, shared state)
//! - [`metrics`]: Prometheus metrics
//! - [`shutdown`]: Signal-triggered graceful shutdown

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod metrics;
pub mod provision;
pub mod shutdown;

pub use config::Config;
pub use error::{Result, ServiceError};
