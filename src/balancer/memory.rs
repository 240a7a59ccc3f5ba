//! Single-node in-memory engine
//!
//! Keeps services, destinations and checks in ordered maps behind one lock and
//! implements the full `Balancer` contract, including delete cascades and a
//! leadership re-check on every write. It programs no data plane.

use super::cluster::ClusterState;
use super::types::{CheckSpec, Destination, Service};
use super::Balancer;
use crate::common::{Error, Result};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct State {
    services: BTreeMap<String, Service>,
    /// Keyed by destination name across all services
    destinations: BTreeMap<String, Destination>,
    /// Keyed by owning service name
    checks: BTreeMap<String, CheckSpec>,
}

/// In-memory balancer
pub struct MemoryBalancer {
    cluster: Arc<ClusterState>,
    state: RwLock<State>,
}

impl MemoryBalancer {
    pub fn new(cluster: Arc<ClusterState>) -> Self {
        Self {
            cluster,
            state: RwLock::new(State::default()),
        }
    }

    /// Single-node engine that immediately holds leadership
    pub fn standalone(node_id: impl Into<String>) -> Self {
        let cluster = Arc::new(ClusterState::new(node_id));
        cluster.become_leader();
        Self::new(cluster)
    }

    pub fn cluster(&self) -> &Arc<ClusterState> {
        &self.cluster
    }

    /// Current health check of a service, if any
    pub fn check(&self, service_id: &str) -> Option<CheckSpec> {
        self.read().checks.get(service_id).cloned()
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>> {
        if !self.cluster.is_leader() {
            return Err(Error::NotLeader);
        }
        Ok(self.state.write().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Balancer for MemoryBalancer {
    fn list_services(&self) -> Vec<Service> {
        self.read().services.values().cloned().collect()
    }

    fn get_service(&self, name: &str) -> Result<Service> {
        self.read()
            .services
            .get(name)
            .cloned()
            .ok_or_else(|| Error::service_not_found(name))
    }

    fn create_service(&self, service: Service) -> Result<()> {
        service.validate()?;
        let mut state = self.write()?;
        if state.services.contains_key(&service.name) {
            return Err(Error::Conflict {
                kind: "service",
                name: service.name,
            });
        }
        tracing::info!(service = %service.name, port = service.port, "Service created");
        state.services.insert(service.name.clone(), service);
        Ok(())
    }

    fn delete_service(&self, name: &str) -> Result<()> {
        let mut state = self.write()?;
        if state.services.remove(name).is_none() {
            return Err(Error::service_not_found(name));
        }
        let before = state.destinations.len();
        state.destinations.retain(|_, d| d.service_id != name);
        let dropped = before - state.destinations.len();
        state.checks.remove(name);
        tracing::info!(service = %name, destinations = dropped, "Service deleted");
        Ok(())
    }

    fn create_destination(&self, service: &Service, mut destination: Destination) -> Result<()> {
        destination.service_id = service.name.clone();
        destination.validate()?;
        let mut state = self.write()?;
        if !state.services.contains_key(&service.name) {
            return Err(Error::Validation(format!(
                "service '{}' does not exist",
                service.name
            )));
        }
        if let Some(existing) = state.destinations.get(&destination.name) {
            // Names are unique across services
            let name = if existing.service_id == destination.service_id {
                destination.name
            } else {
                format!(
                    "{} (names are cluster-wide, held by service '{}')",
                    destination.name, existing.service_id
                )
            };
            return Err(Error::Conflict {
                kind: "destination",
                name,
            });
        }
        // IPVS rejects the same real server twice under one virtual service
        if state.destinations.values().any(|d| {
            d.service_id == destination.service_id
                && d.address == destination.address
                && d.port == destination.port
        }) {
            return Err(Error::Conflict {
                kind: "destination",
                name: format!("{}:{}", destination.address, destination.port),
            });
        }
        tracing::info!(
            service = %destination.service_id,
            destination = %destination.name,
            "Destination created"
        );
        state
            .destinations
            .insert(destination.name.clone(), destination);
        Ok(())
    }

    fn get_destination(&self, name: &str) -> Result<Destination> {
        self.read()
            .destinations
            .get(name)
            .cloned()
            .ok_or_else(|| Error::destination_not_found(name))
    }

    fn list_destinations(&self, service: &Service) -> Vec<Destination> {
        self.read()
            .destinations
            .values()
            .filter(|d| d.service_id == service.name)
            .cloned()
            .collect()
    }

    fn delete_destination(&self, destination: &Destination) -> Result<()> {
        let mut state = self.write()?;
        let owned = state
            .destinations
            .get(&destination.name)
            .is_some_and(|d| d.service_id == destination.service_id);
        if !owned {
            return Err(Error::destination_not_found(&destination.name));
        }
        state.destinations.remove(&destination.name);
        tracing::info!(
            service = %destination.service_id,
            destination = %destination.name,
            "Destination deleted"
        );
        Ok(())
    }

    fn create_check(&self, check: CheckSpec) -> Result<()> {
        check.validate()?;
        let mut state = self.write()?;
        if !state.services.contains_key(&check.service_id) {
            return Err(Error::Validation(format!(
                "service '{}' does not exist",
                check.service_id
            )));
        }
        tracing::info!(service = %check.service_id, kind = %check.kind, "Check registered");
        // One check per service; a new check replaces the old one
        state.checks.insert(check.service_id.clone(), check);
        Ok(())
    }

    fn delete_check(&self, check: CheckSpec) -> Result<()> {
        let mut state = self.write()?;
        if state.checks.remove(&check.service_id).is_none() {
            return Err(Error::check_not_found(check.service_id));
        }
        tracing::info!(service = %check.service_id, "Check removed");
        Ok(())
    }

    fn is_leader(&self) -> bool {
        self.cluster.is_leader()
    }
}
