//! Cross-cutting request handling: access logging and failure rendering.

use std::any::Any;
use std::time::Duration;

use axum::{
    body::HttpBody,
    extract::{Request, State},
    http::{self, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tower_http::trace::{MakeSpan, OnResponse};
use tracing::{error, info, Span};

use super::handlers::ErrorResponse;
use crate::config::Environment;
use crate::error::{internal_failure_response, InternalFailure};

/// Opens one span per request carrying method and path.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessLogSpan;

impl<B> MakeSpan<B> for AccessLogSpan {
    fn make_span(&mut self, request: &http::Request<B>) -> Span {
        tracing::info_span!(
            "request",
            method = %request.method(),
            path = %request.uri().path(),
        )
    }
}

/// Emits the access log line: status, latency and body size.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessLogResponse;

impl<B: HttpBody> OnResponse<B> for AccessLogResponse {
    fn on_response(self, response: &http::Response<B>, latency: Duration, _span: &Span) {
        let size = response
            .body()
            .size_hint()
            .exact()
            .map_or_else(|| "-".to_string(), |n| n.to_string());

        info!(
            "{} {:.3} ms - {}",
            response.status().as_u16(),
            latency.as_secs_f64() * 1000.0,
            size
        );
    }
}

/// Log internal failures and pick the message the client sees.
///
/// Responses carrying an [`InternalFailure`] get the detail logged at error
/// level. The body keeps the generic message unless the environment allows
/// exposing details.
pub async fn render_failures(
    State(environment): State<Environment>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;
    let failure = response.extensions_mut().remove::<InternalFailure>();
    let Some(InternalFailure(detail)) = failure else {
        return response;
    };

    error!(%method, %path, error = %detail, "request failed");

    if environment.exposes_error_details() {
        let body = ErrorResponse::new("Internal Server Error", detail);
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
    }

    response
}

/// Turn a handler panic into an internal failure response.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else {
        "handler panicked".to_string()
    };

    internal_failure_response(detail)
}
