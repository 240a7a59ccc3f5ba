//! Service routes
//!
//! - `GET /services`
//! - `GET /services/:service_name`
//! - `POST /services`
//! - `DELETE /services/:service_name`

use super::gate::ensure_leader;
use super::response::ApiResult;
use super::ApiState;
use crate::balancer::{Destination, Service};
use crate::common::{Error, Result};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

/// Body of `POST /services`
#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    #[serde(default)]
    pub name: String,
    pub address: Option<String>,
    pub port: Option<i64>,
    pub protocol: Option<String>,
    pub scheduler: Option<String>,
}

impl TryFrom<CreateServiceRequest> for Service {
    type Error = Error;

    fn try_from(req: CreateServiceRequest) -> Result<Self> {
        let port = parse_port(req.port)?
            .ok_or_else(|| Error::Validation("port is required".into()))?;
        let address = req
            .address
            .filter(|a| !a.is_empty())
            .map(|a| {
                a.parse()
                    .map_err(|_| Error::Validation(format!("invalid address '{}'", a)))
            })
            .transpose()?;

        let service = Service {
            name: req.name,
            address,
            port,
            protocol: req.protocol.as_deref().unwrap_or("tcp").parse()?,
            scheduler: req.scheduler.as_deref().unwrap_or("rr").parse()?,
        };
        service.validate()?;
        Ok(service)
    }
}

/// Range-check an optional port field
pub(crate) fn parse_port(port: Option<i64>) -> Result<Option<u16>> {
    match port {
        None => Ok(None),
        Some(p) => u16::try_from(p)
            .ok()
            .filter(|p| *p != 0)
            .map(Some)
            .ok_or_else(|| Error::Validation(format!("port {} out of range 1-65535", p))),
    }
}

/// Representation of a single service with its destinations
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceDetail {
    #[serde(flatten)]
    pub service: Service,
    pub destinations: Vec<Destination>,
}

pub async fn list_services(State(state): State<ApiState>) -> Json<Vec<Service>> {
    Json(state.balancer.list_services())
}

pub async fn get_service(
    State(state): State<ApiState>,
    path: std::result::Result<Path<String>, PathRejection>,
) -> ApiResult<Json<ServiceDetail>> {
    let Path(service_name) = path?;
    let service = state.balancer.get_service(&service_name)?;
    let destinations = state.balancer.list_destinations(&service);
    Ok(Json(ServiceDetail {
        service,
        destinations,
    }))
}

pub async fn create_service(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<CreateServiceRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    let service = Service::try_from(req)?;

    ensure_leader(state.balancer.as_ref(), "create_service")?;
    state.balancer.create_service(service.clone())?;

    Ok((StatusCode::CREATED, Json(service)))
}

pub async fn delete_service(
    State(state): State<ApiState>,
    path: std::result::Result<Path<String>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(service_name) = path?;
    ensure_leader(state.balancer.as_ref(), "delete_service")?;
    state.balancer.delete_service(&service_name)?;
    Ok(StatusCode::NO_CONTENT)
}
