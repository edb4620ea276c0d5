//! HTTP API module for health, status, and welcome endpoints.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::AppState;
pub use routes::{create_app, create_router, App};
