//! Health-check routes
//!
//! - `POST /services/:service_name/check`
//! - `DELETE /services/:service_name/check`
//!
//! The service name from the path is folded into `CheckSpec::service_id`
//! before the engine sees the check; any service id in the body is ignored.

use super::gate::ensure_leader;
use super::response::ApiResult;
use super::ApiState;
use crate::balancer::types::{DEFAULT_CHECK_INTERVAL, DEFAULT_CHECK_TIMEOUT};
use crate::balancer::CheckSpec;
use crate::common::{parse_duration, Result};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

/// Body of `POST /services/:service_name/check`
#[derive(Debug, Default, Deserialize)]
pub struct CreateCheckRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub path: Option<String>,
    pub interval: Option<String>,
    pub timeout: Option<String>,
}

impl CreateCheckRequest {
    fn into_check(self, service_id: &str) -> Result<CheckSpec> {
        let interval = match self.interval {
            Some(raw) => parse_duration(&raw)?,
            None => DEFAULT_CHECK_INTERVAL,
        };
        let timeout = match self.timeout {
            Some(raw) => parse_duration(&raw)?,
            None => DEFAULT_CHECK_TIMEOUT.min(interval),
        };

        let check = CheckSpec {
            service_id: service_id.to_string(),
            kind: self.kind.as_deref().unwrap_or("tcp").parse()?,
            path: self.path,
            interval,
            timeout,
        };
        check.validate()?;
        Ok(check)
    }
}

pub async fn create_check(
    State(state): State<ApiState>,
    path: std::result::Result<Path<String>, PathRejection>,
    payload: std::result::Result<Json<CreateCheckRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(service_name) = path?;
    let Json(req) = payload?;
    let check = req.into_check(&service_name)?;

    ensure_leader(state.balancer.as_ref(), "create_check")?;
    state.balancer.get_service(&service_name)?;
    state.balancer.create_check(check.clone())?;

    Ok((StatusCode::CREATED, Json(check)))
}

pub async fn delete_check(
    State(state): State<ApiState>,
    path: std::result::Result<Path<String>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(service_name) = path?;
    ensure_leader(state.balancer.as_ref(), "delete_check")?;
    state
        .balancer
        .delete_check(CheckSpec::for_service(service_name))?;
    Ok(StatusCode::NO_CONTENT)
}
