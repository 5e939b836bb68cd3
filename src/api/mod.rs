//! HTTP API module for the health, readiness, and dependency endpoints.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
