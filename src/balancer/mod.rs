//! Balancer contract consumed by the control plane
//!
//! The API layer only ever talks to an `Arc<dyn Balancer>`. Any engine
//! (single node, clustered, or a test double) that implements the trait can be
//! substituted without touching the handlers.
//!
//! Calls are synchronous units of work: no retries, caching or batching happen
//! on this side of the seam.

pub mod cluster;
pub mod memory;
pub mod types;

pub use cluster::{ClusterState, NodeRole};
pub use memory::MemoryBalancer;
pub use types::{CheckKind, CheckSpec, Destination, ForwardingMode, Protocol, Scheduler, Service};

use crate::common::Result;

/// Capability set of a balancing engine.
///
/// Engines own all state and enforce cascades (deleting a service drops its
/// destinations and check). They may re-check leadership on writes.
pub trait Balancer: Send + Sync {
    /// All services, in engine order. An empty engine yields an empty list.
    fn list_services(&self) -> Vec<Service>;

    fn get_service(&self, name: &str) -> Result<Service>;

    fn create_service(&self, service: Service) -> Result<()>;

    fn delete_service(&self, name: &str) -> Result<()>;

    fn create_destination(&self, service: &Service, destination: Destination) -> Result<()>;

    fn get_destination(&self, name: &str) -> Result<Destination>;

    fn list_destinations(&self, service: &Service) -> Vec<Destination>;

    fn delete_destination(&self, destination: &Destination) -> Result<()>;

    fn create_check(&self, check: CheckSpec) -> Result<()>;

    fn delete_check(&self, check: CheckSpec) -> Result<()>;

    /// Whether this node currently holds cluster leadership.
    ///
    /// Must be cheap and side-effect free; callers query it on every write.
    fn is_leader(&self) -> bool;
}
