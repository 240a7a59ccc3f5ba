//! Local view of cluster leadership
//!
//! Election itself lives outside this crate. Whatever drives membership calls
//! `become_leader` / `step_down`; the engine and the API only read the role.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Role of this node in the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Follower,
    Leader,
}

impl std::fmt::Display for NodeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeRole::Follower => write!(f, "follower"),
            NodeRole::Leader => write!(f, "leader"),
        }
    }
}

#[derive(Debug)]
struct Inner {
    role: NodeRole,
    term: u64,
    leader_id: Option<String>,
}

/// Leadership state of one node
#[derive(Debug)]
pub struct ClusterState {
    node_id: String,
    inner: Mutex<Inner>,
}

impl ClusterState {
    /// New node, starting as a follower with no known leader
    pub fn new(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            inner: Mutex::new(Inner {
                role: NodeRole::Follower,
                term: 0,
                leader_id: None,
            }),
        }
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn is_leader(&self) -> bool {
        self.inner().role == NodeRole::Leader
    }

    pub fn role(&self) -> NodeRole {
        self.inner().role
    }

    pub fn leader(&self) -> Option<String> {
        self.inner().leader_id.clone()
    }

    pub fn term(&self) -> u64 {
        self.inner().term
    }

    /// Take leadership in a new term
    pub fn become_leader(&self) {
        let mut inner = self.inner();
        inner.term += 1;
        inner.role = NodeRole::Leader;
        inner.leader_id = Some(self.node_id.clone());
        tracing::info!(node_id = %self.node_id, term = inner.term, "Became leader");
    }

    /// Step down to follower, recording the new leader if known
    pub fn step_down(&self, new_term: u64, leader_id: Option<String>) {
        let mut inner = self.inner();
        inner.role = NodeRole::Follower;
        inner.term = inner.term.max(new_term);
        inner.leader_id = leader_id;
        tracing::info!(node_id = %self.node_id, term = inner.term, "Stepped down to follower");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_as_follower() {
        let node = ClusterState::new("node1");
        assert!(!node.is_leader());
        assert_eq!(node.role(), NodeRole::Follower);
        assert_eq!(node.leader(), None);
        assert_eq!(node.term(), 0);
    }

    #[test]
    fn test_leadership_transitions() {
        let node = ClusterState::new("node1");
        node.become_leader();
        assert!(node.is_leader());
        assert_eq!(node.leader().as_deref(), Some("node1"));
        assert_eq!(node.term(), 1);

        node.step_down(3, Some("node2".into()));
        assert!(!node.is_leader());
        assert_eq!(node.role().to_string(), "follower");
        assert_eq!(node.leader().as_deref(), Some("node2"));
        assert_eq!(node.term(), 3);

        // Terms never go backwards
        node.step_down(1, None);
        assert_eq!(node.term(), 3);
    }
}
