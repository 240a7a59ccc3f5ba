//! Error types for fusis

use axum::http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // === Resource Errors ===
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("{kind} already exists: {name}")]
    Conflict { kind: &'static str, name: String },

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("method {method} not allowed on {path}")]
    MethodNotAllowed { method: String, path: String },

    // === Cluster Errors ===
    #[error("This node is not the cluster leader, retry against the leader")]
    NotLeader,

    // === Process Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn service_not_found(name: impl Into<String>) -> Self {
        Error::NotFound {
            kind: "service",
            name: name.into(),
        }
    }

    pub fn destination_not_found(name: impl Into<String>) -> Self {
        Error::NotFound {
            kind: "destination",
            name: name.into(),
        }
    }

    pub fn check_not_found(service: impl Into<String>) -> Self {
        Error::NotFound {
            kind: "check for service",
            name: service.into(),
        }
    }

    /// Is this a retryable error?
    ///
    /// Only a leadership rejection is: the same request succeeds against the leader.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::NotLeader)
    }

    /// Machine-readable tag rendered in error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Error::NotFound { .. } => "not_found",
            Error::Conflict { .. } => "conflict",
            Error::Validation(_) => "validation",
            Error::MethodNotAllowed { .. } => "method_not_allowed",
            Error::NotLeader => "not_leader",
            Error::Io(_) | Error::InvalidConfig(_) | Error::Internal(_) => "internal",
        }
    }

    /// Convert to HTTP status code
    pub fn to_http_status(&self) -> StatusCode {
        match self {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Conflict { .. } => StatusCode::CONFLICT,
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Error::NotLeader => StatusCode::SERVICE_UNAVAILABLE,
            Error::Io(_) | Error::InvalidConfig(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::InvalidConfig(e.to_string())
    }
}
