//! Integration tests for the House Arena API router.
//!
//! Requests are driven through the full router and middleware stack
//! in-process; runtime stats come from fake providers.
//!
//! Run with: cargo test --test integration

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::Value;
use tower::ServiceExt;

use house_arena_api::api::{create_app, App, AppState};
use house_arena_api::config::Environment;
use house_arena_api::error::StatsError;
use house_arena_api::stats::{MemoryUsage, RuntimeStats};

const MB: u64 = 1024 * 1024;

/// Provider with fixed counters.
struct FixedStats {
    uptime: Duration,
    memory: MemoryUsage,
}

impl RuntimeStats for FixedStats {
    fn uptime(&self) -> Duration {
        self.uptime
    }

    fn memory(&self) -> Result<MemoryUsage, StatsError> {
        Ok(self.memory)
    }
}

/// Provider whose memory read always fails.
struct FailingStats;

impl RuntimeStats for FailingStats {
    fn uptime(&self) -> Duration {
        Duration::ZERO
    }

    fn memory(&self) -> Result<MemoryUsage, StatsError> {
        Err(StatsError::ProcessNotFound(4242))
    }
}

/// Provider that panics mid-request.
struct PanickingStats;

impl RuntimeStats for PanickingStats {
    fn uptime(&self) -> Duration {
        panic!("uptime counter corrupted")
    }

    fn memory(&self) -> Result<MemoryUsage, StatsError> {
        Ok(MemoryUsage::default())
    }
}

fn fixed_stats() -> FixedStats {
    FixedStats {
        uptime: Duration::from_millis(3_661_900),
        memory: MemoryUsage {
            heap_used: 52_428_800,
            heap_total: 100 * MB,
            rss: 1_000_000,
        },
    }
}

fn app_with(stats: impl RuntimeStats + 'static, environment: Environment) -> App {
    create_app(AppState::new(Arc::new(stats), environment))
}

fn production() -> Environment {
    Environment::new(Some("production".to_string()))
}

async fn send(app: App, method: Method, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(app: App, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri).await
}

fn assert_timestamp(body: &Value) {
    let ts = body["timestamp"].as_str().expect("timestamp is a string");
    assert!(!ts.is_empty());
    assert!(
        chrono::DateTime::parse_from_rfc3339(ts).is_ok(),
        "unparseable timestamp {ts}"
    );
}

#[tokio::test]
async fn health_reports_healthy() {
    let (status, body) = get(app_with(fixed_stats(), production()), "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "house-arena-backend");
    assert_eq!(body["version"], "1.1.0");
    assert_timestamp(&body);
}

#[tokio::test]
async fn health_ignores_broken_stats() {
    let (status, body) = get(app_with(FailingStats, production()), "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn status_reports_uptime_and_memory() {
    let (status, body) = get(app_with(fixed_stats(), production()), "/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "operational");
    assert_eq!(body["uptime"]["seconds"], 3661);
    assert_eq!(body["uptime"]["formatted"], "1h 1m 1s");
    assert_eq!(body["memory"]["heapUsed"], "50MB");
    assert_eq!(body["memory"]["heapTotal"], "100MB");
    assert_eq!(body["memory"]["rss"], "1MB");
    assert_eq!(body["environment"], "production");
    assert!(body["runtimeVersion"]
        .as_str()
        .unwrap()
        .starts_with("house_arena_api 1.1.0"));
    assert_timestamp(&body);
}

#[tokio::test]
async fn status_at_startup() {
    let stats = FixedStats {
        uptime: Duration::from_millis(999),
        memory: MemoryUsage::default(),
    };
    let (_, body) = get(app_with(stats, Environment::default()), "/api/status").await;

    assert_eq!(body["uptime"]["seconds"], 0);
    assert_eq!(body["uptime"]["formatted"], "0h 0m 0s");
    assert_eq!(body["memory"]["rss"], "0MB");
    assert_eq!(body["environment"], "development");
}

#[tokio::test]
async fn welcome_lists_two_endpoints_in_order() {
    let (status, body) = get(app_with(fixed_stats(), production()), "/api").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to House Arena API - Live Demo");
    assert_eq!(body["version"], "1.1.0");

    let endpoints = body["endpoints"].as_array().unwrap();
    assert_eq!(endpoints.len(), 2);
    assert_eq!(endpoints[0]["method"], "GET");
    assert_eq!(endpoints[0]["path"], "/api/health");
    assert_eq!(endpoints[0]["description"], "Health check endpoint");
    assert_eq!(endpoints[1]["path"], "/api/status");
    assert_eq!(endpoints[1]["description"], "System status and metrics");
}

#[tokio::test]
async fn unknown_route_echoes_method_and_path() {
    let (status, body) = get(app_with(fixed_stats(), production()), "/api/unknown").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["message"], "Route GET /api/unknown not found");
    assert_timestamp(&body);
}

#[tokio::test]
async fn unknown_route_drops_query_string() {
    let (_, body) = get(app_with(fixed_stats(), production()), "/missing?page=2").await;

    assert_eq!(body["message"], "Route GET /missing not found");
}

#[tokio::test]
async fn trailing_slash_reaches_health() {
    let (status, body) = get(app_with(fixed_stats(), production()), "/api/health/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn trailing_slash_reaches_welcome() {
    let (status, body) = get(app_with(fixed_stats(), production()), "/api/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["endpoints"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn paths_match_case_insensitively() {
    let (status, body) = get(app_with(fixed_stats(), production()), "/API/Status?Fields=All").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "operational");
}

#[tokio::test]
async fn not_found_echoes_path_as_sent() {
    let (status, body) = get(app_with(fixed_stats(), production()), "/API/Unknown/").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Route GET /API/Unknown/ not found");
}

#[tokio::test]
async fn unsupported_method_is_not_found() {
    let (status, body) = send(
        app_with(fixed_stats(), production()),
        Method::DELETE,
        "/api/status",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Route DELETE /api/status not found");
}

#[tokio::test]
async fn internal_error_is_generic_outside_development() {
    let (status, body) = get(app_with(FailingStats, production()), "/api/status").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal Server Error");
    assert_eq!(body["message"], "Something went wrong");
    assert!(!body["message"].as_str().unwrap().contains("4242"));
    assert_timestamp(&body);
}

#[tokio::test]
async fn internal_error_is_generic_when_environment_unset() {
    let (status, body) = get(app_with(FailingStats, Environment::default()), "/api/status").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Something went wrong");
}

#[tokio::test]
async fn internal_error_is_detailed_in_development() {
    let (status, body) = get(
        app_with(FailingStats, Environment::development()),
        "/api/status",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal Server Error");
    assert_eq!(body["message"], "process 4242 not found");
}

#[tokio::test]
async fn handler_panic_is_generic_outside_development() {
    let (status, body) = get(app_with(PanickingStats, production()), "/api/status").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Something went wrong");
    assert!(!body.to_string().contains("corrupted"));
}

#[tokio::test]
async fn handler_panic_is_detailed_in_development() {
    let (status, body) = get(
        app_with(PanickingStats, Environment::development()),
        "/api/status",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "uptime counter corrupted");
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let response = app_with(fixed_stats(), production())
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/status")
                .header(header::ORIGIN, "https://dashboard.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn error_responses_carry_cors_headers() {
    let response = app_with(FailingStats, production())
        .oneshot(
            Request::builder()
                .uri("/api/status")
                .header(header::ORIGIN, "https://dashboard.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}
