//! House Arena demo API.
//!
//! A small read-only HTTP service used to exercise container health checks
//! and CI/CD pipelines:
//!
//! ```text
//! GET /api/health  -> liveness: {"status":"healthy", ...}
//! GET /api/status  -> uptime, memory, environment
//! GET /api         -> welcome message and endpoint list
//! *                -> 404 {"error":"Not Found", ...}
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`stats`]: Process uptime and memory counters
//! - [`api`]: HTTP router, handlers and middleware
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod stats;
pub mod utils;

pub use config::Config;
pub use error::{ApiError, Result};
