#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use surecall::{
    ClientConfig, EndpointDescriptor, Method, Operation, Request, ResourceCatalog,
    ResourceClient, RetryPolicy, Transport, TransportError, TrackingSleeper,
};

/// Transport that replays a scripted sequence of responses and records every
/// request it was handed.
#[derive(Clone)]
pub struct ScriptedTransport {
    script: Arc<Mutex<VecDeque<Result<Value, TransportError>>>>,
    calls: Arc<Mutex<Vec<Request>>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<Value, TransportError>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into_iter().collect())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<Request> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: Request) -> Result<Value, TransportError> {
        self.calls.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("transport script exhausted"))
    }
}

pub fn ep(op: Operation, title: &str, method: Method, path: &str) -> EndpointDescriptor {
    EndpointDescriptor {
        operation: op,
        title: title.to_string(),
        method,
        path_or_url: path.to_string(),
        is_relative: true,
        doc_source: None,
    }
}

/// Catalog covering reads, writes, and two workflow actions.
pub fn full_catalog() -> ResourceCatalog {
    ResourceCatalog::build(&[
        ep(Operation::ReadList, "customer list", Method::Get, "/v2/bd/customer_list"),
        ep(Operation::ReadDetail, "customer detail", Method::Get, "/v2/bd/customer_detail"),
        ep(Operation::WriteUpsert, "customer save", Method::Post, "/v2/bd/customer"),
        ep(Operation::WriteCreate, "customer create", Method::Post, "/v2/bd/customer_add"),
        ep(Operation::WriteUpdate, "customer update", Method::Post, "/v2/bd/customer_edit"),
        ep(Operation::WriteDelete, "customer delete", Method::Post, "/v2/bd/customer_rm"),
        ep(Operation::WorkflowSubmit, "customer submit", Method::Post, "/v2/bd/customer_submit"),
        ep(Operation::WorkflowAudit, "customer audit", Method::Post, "/v2/bd/customer_audit"),
    ])
}

/// Deterministic config: fixed idempotency token, host as in the docs.
pub fn test_config() -> ClientConfig {
    let mut config = ClientConfig::new("https://api.example.com");
    config.token_source = Arc::new(|| "fixed-token".to_string());
    config
}

/// Instant retry policy so suites never wait on the clock.
pub fn instant_retry(max_retries: usize) -> RetryPolicy {
    RetryPolicy::builder()
        .max_retries(max_retries)
        .base_delay(Duration::from_millis(500))
        .with_jitter(Arc::new(|| 0.0))
        .with_sleeper(TrackingSleeper::new())
        .build()
    // the tracking sleeper resolves immediately; callers that need the
    // recorded delays build their own policy
}

pub fn client_with(
    catalog: ResourceCatalog,
    script: Vec<Result<Value, TransportError>>,
) -> (ResourceClient<ScriptedTransport>, ScriptedTransport) {
    let transport = ScriptedTransport::new(script);
    let client = ResourceClient::new(catalog, transport.clone(), test_config())
        .with_retry_policy(instant_retry(3));
    (client, transport)
}
