//! Shared helpers for the API integration tests
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use fusis::balancer::{CheckSpec, Destination, Service};
use fusis::{ApiService, Balancer, MemoryBalancer, Result};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

/// Router over a fresh single-node engine that holds leadership
pub fn leader_app() -> Router {
    ApiService::new(Arc::new(MemoryBalancer::standalone("test-node"))).router()
}

/// Send one request and decode the JSON body (`Null` when empty)
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Engine double: forwards to a real engine, counts every contract call
/// except `is_leader`, and reports leadership from its own switch.
pub struct CountingBalancer {
    inner: MemoryBalancer,
    leader: AtomicBool,
    calls: AtomicUsize,
}

impl CountingBalancer {
    pub fn new(leader: bool) -> Self {
        Self {
            inner: MemoryBalancer::standalone("counting"),
            leader: AtomicBool::new(leader),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_leader(&self, leader: bool) {
        self.leader.store(leader, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl Balancer for CountingBalancer {
    fn list_services(&self) -> Vec<Service> {
        self.hit();
        self.inner.list_services()
    }

    fn get_service(&self, name: &str) -> Result<Service> {
        self.hit();
        self.inner.get_service(name)
    }

    fn create_service(&self, service: Service) -> Result<()> {
        self.hit();
        self.inner.create_service(service)
    }

    fn delete_service(&self, name: &str) -> Result<()> {
        self.hit();
        self.inner.delete_service(name)
    }

    fn create_destination(&self, service: &Service, destination: Destination) -> Result<()> {
        self.hit();
        self.inner.create_destination(service, destination)
    }

    fn get_destination(&self, name: &str) -> Result<Destination> {
        self.hit();
        self.inner.get_destination(name)
    }

    fn list_destinations(&self, service: &Service) -> Vec<Destination> {
        self.hit();
        self.inner.list_destinations(service)
    }

    fn delete_destination(&self, destination: &Destination) -> Result<()> {
        self.hit();
        self.inner.delete_destination(destination)
    }

    fn create_check(&self, check: CheckSpec) -> Result<()> {
        self.hit();
        self.inner.create_check(check)
    }

    fn delete_check(&self, check: CheckSpec) -> Result<()> {
        self.hit();
        self.inner.delete_check(check)
    }

    fn is_leader(&self) -> bool {
        self.leader.load(Ordering::SeqCst)
    }
}

/// Engine double whose reads panic a fixed number of times
pub struct PanickingBalancer {
    inner: MemoryBalancer,
    panics_left: AtomicUsize,
}

impl PanickingBalancer {
    pub fn new(panics: usize) -> Self {
        Self {
            inner: MemoryBalancer::standalone("panicking"),
            panics_left: AtomicUsize::new(panics),
        }
    }

    fn maybe_panic(&self) {
        let left = self
            .panics_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if left.is_ok() {
            panic!("engine exploded");
        }
    }
}

impl Balancer for PanickingBalancer {
    fn list_services(&self) -> Vec<Service> {
        self.maybe_panic();
        self.inner.list_services()
    }

    fn get_service(&self, name: &str) -> Result<Service> {
        self.maybe_panic();
        self.inner.get_service(name)
    }

    fn create_service(&self, service: Service) -> Result<()> {
        self.inner.create_service(service)
    }

    fn delete_service(&self, name: &str) -> Result<()> {
        self.inner.delete_service(name)
    }

    fn create_destination(&self, service: &Service, destination: Destination) -> Result<()> {
        self.inner.create_destination(service, destination)
    }

    fn get_destination(&self, name: &str) -> Result<Destination> {
        self.inner.get_destination(name)
    }

    fn list_destinations(&self, service: &Service) -> Vec<Destination> {
        self.inner.list_destinations(service)
    }

    fn delete_destination(&self, destination: &Destination) -> Result<()> {
        self.inner.delete_destination(destination)
    }

    fn create_check(&self, check: CheckSpec) -> Result<()> {
        self.inner.create_check(check)
    }

    fn delete_check(&self, check: CheckSpec) -> Result<()> {
        self.inner.delete_check(check)
    }

    fn is_leader(&self) -> bool {
        self.inner.is_leader()
    }
}
