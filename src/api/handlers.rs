//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, State},
    http::Method,
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::debug;

use crate::config::Environment;
use crate::error::{ApiError, Result};
use crate::stats::{bytes_to_megabytes, format_uptime, runtime_version, RuntimeStats};

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "house-arena-backend";
/// API version.
pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

const WELCOME_MESSAGE: &str = "Welcome to House Arena API - Live Demo";

/// Endpoints advertised by the welcome handler, in order.
pub const ENDPOINTS: [EndpointInfo; 2] = [
    EndpointInfo {
        method: "GET",
        path: "/api/health",
        description: "Health check endpoint",
    },
    EndpointInfo {
        method: "GET",
        path: "/api/status",
        description: "System status and metrics",
    },
];

/// Application state shared with handlers. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    /// Uptime and memory source.
    pub stats: Arc<dyn RuntimeStats>,
    /// Resolved deployment environment.
    pub environment: Environment,
}

impl AppState {
    /// Create new app state.
    pub fn new(stats: Arc<dyn RuntimeStats>, environment: Environment) -> Self {
        Self { stats, environment }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "healthy".
    pub status: &'static str,
    /// ISO-8601 response time.
    pub timestamp: String,
    /// Service name.
    pub service: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Status response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Always "operational".
    pub status: &'static str,
    /// ISO-8601 response time.
    pub timestamp: String,
    /// Time since process start.
    pub uptime: UptimeResponse,
    /// Memory counters.
    pub memory: MemoryResponse,
    /// Environment name.
    pub environment: String,
    /// Service and platform identification.
    pub runtime_version: String,
}

/// Uptime in status response.
#[derive(Debug, Serialize)]
pub struct UptimeResponse {
    /// Whole seconds since start.
    pub seconds: u64,
    /// `"{h}h {m}m {s}s"`.
    pub formatted: String,
}

/// Memory in status response, each value formatted as `"{n}MB"`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryResponse {
    /// Memory in use.
    pub heap_used: String,
    /// Memory reserved.
    pub heap_total: String,
    /// Resident set size.
    pub rss: String,
}

/// Welcome response.
#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    /// Greeting.
    pub message: &'static str,
    /// API version.
    pub version: &'static str,
    /// Functional endpoints.
    pub endpoints: &'static [EndpointInfo],
}

/// Endpoint descriptor.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EndpointInfo {
    /// HTTP method.
    pub method: &'static str,
    /// Request path.
    pub path: &'static str,
    /// What the endpoint returns.
    pub description: &'static str,
}

/// Error body for 404 and 500 responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error kind, e.g. "Not Found".
    pub error: &'static str,
    /// Human-readable detail.
    pub message: String,
    /// ISO-8601 response time.
    pub timestamp: String,
}

impl ErrorResponse {
    /// Error body stamped with the current time.
    pub fn new(error: &'static str, message: impl Into<String>) -> Self {
        Self {
            error,
            message: message.into(),
            timestamp: timestamp(),
        }
    }
}

/// Current UTC time as ISO-8601 with millisecond precision.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn megabytes(bytes: u64) -> String {
    format!("{}MB", bytes_to_megabytes(bytes))
}

/// Health check handler - always returns 200.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: timestamp(),
        service: SERVICE_NAME,
        version: API_VERSION,
    })
}

/// Status handler - returns uptime, memory and environment.
pub async fn status(State(state): State<AppState>) -> Result<Json<StatusResponse>> {
    let uptime = state.stats.uptime().as_secs();
    let memory = state.stats.memory()?;
    debug!(uptime, rss = memory.rss, "collected runtime stats");

    Ok(Json(StatusResponse {
        status: "operational",
        timestamp: timestamp(),
        uptime: UptimeResponse {
            seconds: uptime,
            formatted: format_uptime(uptime),
        },
        memory: MemoryResponse {
            heap_used: megabytes(memory.heap_used),
            heap_total: megabytes(memory.heap_total),
            rss: megabytes(memory.rss),
        },
        environment: state.environment.name().to_string(),
        runtime_version: runtime_version(),
    }))
}

/// Welcome handler - lists the functional endpoints.
pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE,
        version: API_VERSION,
        endpoints: &ENDPOINTS,
    })
}

/// Fallback for unmatched routes. Echoes the path as the client sent it.
pub async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::NotFound {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}
