//! # fusis
//!
//! Control-plane HTTP API of a distributed IP load balancer:
//! - Services (virtual IP/port + scheduler), destinations (real servers)
//!   and health checks, managed over HTTP
//! - Writes accepted only on the cluster leader
//! - Uniform error bodies and deterministic status codes
//!
//! ## Architecture
//!
//! ```text
//!  HTTP request
//!      │
//! ┌────▼──────────────────────────────┐
//! │ request log → panic recovery      │
//! │ handler: validate → leader gate   │
//! └────┬──────────────────────────────┘
//!      │ Arc<dyn Balancer>
//! ┌────▼──────────────────────────────┐
//! │ Balancer engine (owns all state)  │
//! └───────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! fusis-api serve --host 0.0.0.0 --port 8000
//!
//! curl -XPOST localhost:8000/services \
//!   -H 'content-type: application/json' \
//!   -d '{"name":"web","port":80}'
//! ```

pub mod api;
pub mod balancer;
pub mod common;

// Re-export commonly used types
pub use api::{ApiServer, ApiService};
pub use balancer::{Balancer, MemoryBalancer};
pub use common::{Config, Error, Result};

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
