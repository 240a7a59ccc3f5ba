//! Leadership gate for mutating routes

use crate::balancer::Balancer;
use crate::common::{Error, Result};

/// Reject a write unless this node is the leader.
///
/// Leadership is read fresh on every call and never cached. A rejection
/// happens before any other backend call.
pub fn ensure_leader(balancer: &dyn Balancer, operation: &'static str) -> Result<()> {
    if balancer.is_leader() {
        return Ok(());
    }
    tracing::warn!(operation, "Write rejected: not the cluster leader");
    Err(Error::NotLeader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balancer::MemoryBalancer;
    use crate::balancer::{ClusterState, Service};
    use std::sync::Arc;

    #[test]
    fn test_gate_follows_leadership() {
        let cluster = Arc::new(ClusterState::new("node1"));
        let lb = MemoryBalancer::new(cluster.clone());
        assert!(matches!(
            ensure_leader(&lb, "create_service"),
            Err(Error::NotLeader)
        ));

        cluster.become_leader();
        assert!(ensure_leader(&lb, "create_service").is_ok());
        lb.create_service(Service::new("web", 80)).unwrap();

        cluster.step_down(5, None);
        assert!(ensure_leader(&lb, "delete_service").is_err());
    }
}
