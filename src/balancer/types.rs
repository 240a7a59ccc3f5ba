//! Balancer domain types
//!
//! - `Service`: a virtual endpoint (VIP, port, protocol, scheduler)
//! - `Destination`: a real server behind a service
//! - `CheckSpec`: a health-check definition bound to a service

use crate::common::utils::duration_str;
use crate::common::{validate_name, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_WEIGHT: i32 = 1;
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Implements `FromStr` + `Display` over the lowercase wire names of a fieldless enum.
macro_rules! wire_enum {
    ($ty:ident, $what:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub const NAMES: &'static [&'static str] = &[$($name),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($name => Ok($ty::$variant),)+
                    other => Err(Error::Validation(format!(
                        "unknown {} '{}' (expected one of: {})",
                        $what,
                        other,
                        Self::NAMES.join(", ")
                    ))),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Transport protocol of a service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
}

wire_enum!(Protocol, "protocol", { Tcp => "tcp", Udp => "udp" });

/// IPVS scheduling algorithm
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheduler {
    /// Round robin
    #[default]
    Rr,
    /// Weighted round robin
    Wrr,
    /// Least connection
    Lc,
    /// Weighted least connection
    Wlc,
    /// Locality-based least connection
    Lblc,
    /// Locality-based least connection with replication
    Lblcr,
    /// Destination hashing
    Dh,
    /// Source hashing
    Sh,
    /// Shortest expected delay
    Sed,
    /// Never queue
    Nq,
}

wire_enum!(Scheduler, "scheduler", {
    Rr => "rr",
    Wrr => "wrr",
    Lc => "lc",
    Wlc => "wlc",
    Lblc => "lblc",
    Lblcr => "lblcr",
    Dh => "dh",
    Sh => "sh",
    Sed => "sed",
    Nq => "nq",
});

/// How packets reach a destination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForwardingMode {
    Nat,
    /// Direct routing
    #[default]
    Route,
    Tunnel,
}

wire_enum!(ForwardingMode, "mode", { Nat => "nat", Route => "route", Tunnel => "tunnel" });

/// Health-check probe type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    Tcp,
    Http,
}

wire_enum!(CheckKind, "check type", { Tcp => "tcp", Http => "http" });

/// A virtual load-balanced endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    /// Virtual IP; left to the engine when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<IpAddr>,
    pub port: u16,
    #[serde(default)]
    pub protocol: Protocol,
    #[serde(default)]
    pub scheduler: Scheduler,
}

impl Service {
    pub fn new(name: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            address: None,
            port,
            protocol: Protocol::default(),
            scheduler: Scheduler::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_name("name", &self.name)?;
        if self.port == 0 {
            return Err(Error::Validation("port must be between 1 and 65535".into()));
        }
        Ok(())
    }
}

/// A real server receiving traffic for a service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub name: String,
    pub address: IpAddr,
    pub port: u16,
    pub weight: i32,
    pub mode: ForwardingMode,
    /// Name of the owning service
    pub service_id: String,
}

impl Destination {
    pub fn validate(&self) -> Result<()> {
        validate_name("name", &self.name)?;
        if self.port == 0 {
            return Err(Error::Validation("port must be between 1 and 65535".into()));
        }
        if self.weight < 0 {
            return Err(Error::Validation("weight must not be negative".into()));
        }
        Ok(())
    }
}

/// A health-check definition
///
/// The owning service travels inside the check itself (`service_id`); the contract's
/// check operations take nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSpec {
    pub service_id: String,
    #[serde(rename = "type")]
    pub kind: CheckKind,
    /// Request path, HTTP checks only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(with = "duration_str")]
    pub interval: Duration,
    #[serde(with = "duration_str")]
    pub timeout: Duration,
}

impl CheckSpec {
    /// Check addressing a service, as used by delete
    pub fn for_service(service_id: impl Into<String>) -> Self {
        Self {
            service_id: service_id.into(),
            kind: CheckKind::Tcp,
            path: None,
            interval: DEFAULT_CHECK_INTERVAL,
            timeout: DEFAULT_CHECK_TIMEOUT,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.service_id.is_empty() {
            return Err(Error::Validation("service_id is required".into()));
        }
        match (self.kind, self.path.as_deref()) {
            (CheckKind::Http, None) => {
                return Err(Error::Validation("http checks require a path".into()))
            }
            (CheckKind::Http, Some(p)) if !p.starts_with('/') => {
                return Err(Error::Validation("path must start with '/'".into()))
            }
            (CheckKind::Tcp, Some(_)) => {
                return Err(Error::Validation("path is only valid for http checks".into()))
            }
            _ => {}
        }
        if self.interval.is_zero() || self.timeout.is_zero() {
            return Err(Error::Validation(
                "interval and timeout must be greater than zero".into(),
            ));
        }
        if self.timeout > self.interval {
            return Err(Error::Validation(
                "timeout must not exceed interval".into(),
            ));
        }
        Ok(())
    }
}
