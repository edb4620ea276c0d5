//! HTTP API route definitions.

use axum::{
    extract::{OriginalUri, Request},
    http::{uri::PathAndQuery, Uri},
    middleware,
    routing::get,
    Router,
};
use tower::{util::MapRequest, ServiceBuilder};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    normalize_path::{NormalizePath, NormalizePathLayer},
    trace::TraceLayer,
};

use super::handlers::{health, not_found, status, welcome, AppState};
use super::middleware::{handle_panic, render_failures, AccessLogResponse, AccessLogSpan};

type RequestMapper = fn(Request) -> Request;

/// Router wrapped with the path normalization that must run before routing.
pub type App = MapRequest<NormalizePath<MapRequest<Router, RequestMapper>>, RequestMapper>;

/// Create the full service: path normalization around [`create_router`].
///
/// Trailing slashes are trimmed and paths are matched case-insensitively.
/// The path as sent is kept in [`OriginalUri`] for the 404 message.
pub fn create_app(state: AppState) -> App {
    ServiceBuilder::new()
        .map_request(remember_original_uri as RequestMapper)
        .layer(NormalizePathLayer::trim_trailing_slash())
        .map_request(fold_path_case as RequestMapper)
        .service(create_router(state))
}

/// Create the API router.
///
/// Layers, outermost first: access log, CORS, failure rendering, panic
/// catching. Unmatched paths and methods fall through to the 404 handler.
pub fn create_router(state: AppState) -> Router {
    let environment = state.environment.clone();

    Router::new()
        .route("/api", get(welcome).fallback(not_found))
        .route("/api/health", get(health).fallback(not_found))
        .route("/api/status", get(status).fallback(not_found))
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(environment, render_failures))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(AccessLogSpan)
                .on_response(AccessLogResponse)
                .on_failure(()),
        )
        .with_state(state)
}

fn remember_original_uri(mut request: Request) -> Request {
    let uri = request.uri().clone();
    request.extensions_mut().insert(OriginalUri(uri));
    request
}

fn fold_path_case(mut request: Request) -> Request {
    if let Some(uri) = lowercase_path(request.uri()) {
        *request.uri_mut() = uri;
    }
    request
}

// None when the path is already lowercase.
fn lowercase_path(uri: &Uri) -> Option<Uri> {
    let path = uri.path();
    if !path.bytes().any(|b| b.is_ascii_uppercase()) {
        return None;
    }

    let lowered = match uri.query() {
        Some(query) => format!("{}?{}", path.to_ascii_lowercase(), query),
        None => path.to_ascii_lowercase(),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(lowered).ok()?);
    Uri::from_parts(parts).ok()
}
