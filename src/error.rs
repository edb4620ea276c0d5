//! Unified error types for the API service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::handlers::ErrorResponse;

/// Generic message returned for internal failures outside development.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong";

/// Errors surfaced to HTTP clients.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No route matched the request.
    #[error("Route {method} {path} not found")]
    NotFound {
        /// Request method.
        method: String,
        /// Request path, without query string.
        path: String,
    },

    /// A handler failed.
    #[error("{0}")]
    Internal(String),
}

impl From<StatsError> for ApiError {
    fn from(err: StatsError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Failure detail attached to 500 responses.
///
/// The error-rendering middleware consumes it to log the detail and decide
/// what the client sees.
#[derive(Debug, Clone)]
pub struct InternalFailure(pub String);

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::NotFound { .. } => {
                let body = ErrorResponse::new("Not Found", self.to_string());
                (status, Json(body)).into_response()
            }
            ApiError::Internal(detail) => internal_failure_response(detail),
        }
    }
}

/// Build the client-safe 500 response, carrying the detail as an extension.
pub fn internal_failure_response(detail: String) -> Response {
    let body = ErrorResponse::new("Internal Server Error", GENERIC_FAILURE_MESSAGE);
    let mut response = (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
    response.extensions_mut().insert(InternalFailure(detail));
    response
}

/// Runtime stats collection errors.
#[derive(Error, Debug)]
pub enum StatsError {
    /// The current process id could not be determined.
    #[error("failed to determine current pid: {0}")]
    CurrentPid(&'static str),

    /// The process was not found when sampling.
    #[error("process {0} not found")]
    ProcessNotFound(u32),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ApiError>;
