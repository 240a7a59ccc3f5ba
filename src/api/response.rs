//! Outcome → HTTP translation
//!
//! Success bodies are the resource representation. Every failure, including a
//! recovered panic, renders as `{"error": "<kind>", "message": "..."}`.

use crate::common::Error;
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::{header::ALLOW, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::any::Any;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Uniform error body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

/// Error returned by every handler
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(Error::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError(Error::Validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.to_http_status();
        if status.is_server_error() && !self.0.is_retryable() {
            tracing::error!(error = %self.0, "Request failed");
        }

        let body = ErrorBody {
            error: self.0.kind().to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Fallback for paths outside the route table
pub async fn route_not_found(uri: Uri) -> ApiError {
    ApiError(Error::NotFound {
        kind: "route",
        name: uri.path().to_string(),
    })
}

/// Give the router's bare 405 the uniform error body, keeping its `Allow` header
pub async fn method_not_allowed(method: Method, uri: Uri, response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let mut rendered = ApiError(Error::MethodNotAllowed {
        method: method.to_string(),
        path: uri.path().to_string(),
    })
    .into_response();
    if let Some(allow) = response.headers().get(ALLOW) {
        rendered.headers_mut().insert(ALLOW, allow.clone());
    }
    rendered
}

/// Render a panic caught by the recovery layer as a 500
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!(panic = %detail, "Handler panicked");

    ApiError(Error::Internal("request handler panicked".into())).into_response()
}
