//! HTTP control plane
//!
//! Maps each `(method, path)` onto one `Balancer` operation:
//!
//! | Method | Path | Operation |
//! |---|---|---|
//! | GET | /services | list services |
//! | GET | /services/:service_name | get service (with destinations) |
//! | POST | /services | create service |
//! | DELETE | /services/:service_name | delete service |
//! | GET | /services/:service_name/destinations | list destinations |
//! | POST | /services/:service_name/destinations | create destination |
//! | GET | /services/:service_name/destinations/:destination_name | get destination |
//! | DELETE | /services/:service_name/destinations/:destination_name | delete destination |
//! | POST | /services/:service_name/check | create check |
//! | DELETE | /services/:service_name/check | delete check |
//! | GET | /health | node status |
//!
//! Writes pass the leadership gate; reads never do.

pub mod checks;
pub mod destinations;
pub mod gate;
pub mod response;
pub mod server;
pub mod services;

pub use response::{ApiError, ApiResult, ErrorBody};
pub use server::ApiServer;

use crate::balancer::Balancer;
use crate::common::config::DEFAULT_ENV;
use crate::common::request_log::request_log_middleware;
use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;

/// Shared state for HTTP handlers.
#[derive(Clone)]
pub struct ApiState {
    pub balancer: Arc<dyn Balancer>,
    pub env: Arc<str>,
}

/// The control-plane API: backend handle plus route table.
///
/// Built explicitly and owned by the caller, so tests can stand up any number
/// of independent instances.
#[derive(Clone)]
pub struct ApiService {
    state: ApiState,
}

impl ApiService {
    pub fn new(balancer: Arc<dyn Balancer>) -> Self {
        Self {
            state: ApiState {
                balancer,
                env: Arc::from(DEFAULT_ENV),
            },
        }
    }

    /// Set the deployment environment tag reported by `/health`
    pub fn with_env(mut self, env: impl AsRef<str>) -> Self {
        self.state.env = Arc::from(env.as_ref());
        self
    }

    pub fn env(&self) -> &str {
        &self.state.env
    }

    /// Route table with request logging and panic recovery in front of every route.
///
/// Unknown paths, unsupported methods and malformed path segments all answer
/// with the uniform error body.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health))
            .route(
                "/services",
                get(services::list_services).post(services::create_service),
            )
            .route(
                "/services/:service_name",
                get(services::get_service).delete(services::delete_service),
            )
            .route(
                "/services/:service_name/destinations",
                get(destinations::list_destinations).post(destinations::create_destination),
            )
            .route(
                "/services/:service_name/destinations/:destination_name",
                get(destinations::get_destination).delete(destinations::delete_destination),
            )
            .route(
                "/services/:service_name/check",
                post(checks::create_check).delete(checks::delete_check),
            )
            .fallback(response::route_not_found)
            .layer(middleware::map_response(response::method_not_allowed))
            .layer(CatchPanicLayer::custom(response::panic_response))
            .layer(middleware::from_fn(request_log_middleware))
            .with_state(self.state.clone())
    }
}

/// Node status: leadership, environment tag, version.
async fn health(State(state): State<ApiState>) -> Json<Value> {
    let is_leader = state.balancer.is_leader();
    let role = if is_leader { "leader" } else { "follower" };
    Json(json!({
        "status": "healthy",
        "role": role,
        "is_leader": is_leader,
        "env": state.env.as_ref(),
        "version": crate::VERSION,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
