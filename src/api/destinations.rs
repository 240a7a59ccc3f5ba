//! Destination routes, nested under their service
//!
//! - `GET /services/:service_name/destinations`
//! - `POST /services/:service_name/destinations`
//! - `GET /services/:service_name/destinations/:destination_name`
//! - `DELETE /services/:service_name/destinations/:destination_name`

use super::gate::ensure_leader;
use super::response::ApiResult;
use super::services::parse_port;
use super::ApiState;
use crate::balancer::types::DEFAULT_WEIGHT;
use crate::balancer::{Balancer, Destination, ForwardingMode, Service};
use crate::common::{validate_name, Error, Result};
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
use std::net::IpAddr;

/// Body of `POST /services/:service_name/destinations`
///
/// The owning service always comes from the path.
#[derive(Debug, Deserialize)]
pub struct CreateDestinationRequest {
    #[serde(default)]
    pub name: String,
    pub address: Option<String>,
    /// Defaults to the service port
    pub port: Option<i64>,
    pub weight: Option<i32>,
    pub mode: Option<String>,
}

/// A validated request, waiting for its service to be resolved
#[derive(Debug)]
struct NewDestination {
    name: String,
    address: IpAddr,
    port: Option<u16>,
    weight: i32,
    mode: ForwardingMode,
}

impl TryFrom<CreateDestinationRequest> for NewDestination {
    type Error = Error;

    fn try_from(req: CreateDestinationRequest) -> Result<Self> {
        validate_name("name", &req.name)?;
        let address = req
            .address
            .filter(|a| !a.is_empty())
            .ok_or_else(|| Error::Validation("address is required".into()))?;
        let address = address
            .parse()
            .map_err(|_| Error::Validation(format!("invalid address '{}'", address)))?;
        let weight = req.weight.unwrap_or(DEFAULT_WEIGHT);
        if weight < 0 {
            return Err(Error::Validation("weight must not be negative".into()));
        }

        Ok(Self {
            name: req.name,
            address,
            port: parse_port(req.port)?,
            weight,
            mode: req.mode.as_deref().unwrap_or("route").parse()?,
        })
    }
}

impl NewDestination {
    fn bind(self, service: &Service) -> Destination {
        Destination {
            name: self.name,
            address: self.address,
            port: self.port.unwrap_or(service.port),
            weight: self.weight,
            mode: self.mode,
            service_id: service.name.clone(),
        }
    }
}

/// Look up a destination and make sure it belongs to the service in the path
fn owned_destination(
    balancer: &dyn Balancer,
    service_name: &str,
    destination_name: &str,
) -> Result<Destination> {
    let destination = balancer.get_destination(destination_name)?;
    if destination.service_id != service_name {
        return Err(Error::destination_not_found(destination_name));
    }
    Ok(destination)
}

pub async fn list_destinations(
    State(state): State<ApiState>,
    path: std::result::Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Vec<Destination>>> {
    let Path(service_name) = path?;
    let service = state.balancer.get_service(&service_name)?;
    Ok(Json(state.balancer.list_destinations(&service)))
}

pub async fn get_destination(
    State(state): State<ApiState>,
    path: std::result::Result<Path<(String, String)>, PathRejection>,
) -> ApiResult<Json<Destination>> {
    let Path((service_name, destination_name)) = path?;
    let destination = owned_destination(
        state.balancer.as_ref(),
        &service_name,
        &destination_name,
    )?;
    Ok(Json(destination))
}

pub async fn create_destination(
    State(state): State<ApiState>,
    path: std::result::Result<Path<String>, PathRejection>,
    payload: std::result::Result<Json<CreateDestinationRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(service_name) = path?;
    let Json(req) = payload?;
    let draft = NewDestination::try_from(req)?;

    ensure_leader(state.balancer.as_ref(), "create_destination")?;
    let service = state.balancer.get_service(&service_name)?;
    let destination = draft.bind(&service);
    destination.validate()?;
    state
        .balancer
        .create_destination(&service, destination.clone())?;

    Ok((StatusCode::CREATED, Json(destination)))
}

pub async fn delete_destination(
    State(state): State<ApiState>,
    path: std::result::Result<Path<(String, String)>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path((service_name, destination_name)) = path?;
    ensure_leader(state.balancer.as_ref(), "delete_destination")?;
    let destination = owned_destination(
        state.balancer.as_ref(),
        &service_name,
        &destination_name,
    )?;
    state.balancer.delete_destination(&destination)?;
    Ok(StatusCode::NO_CONTENT)
}
