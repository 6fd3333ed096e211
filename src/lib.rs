#![forbid(unsafe_code)]

//! # Surecall
//!
//! Write-verified resource clients for unreliable, eventually consistent
//! HTTP APIs: endpoint election, idempotent retries, and read-after-write
//! verification.
//!
//! ## Features
//!
//! - **Endpoint election** over tagged API documentation, one deterministic
//!   primary route per logical operation
//! - **Retry policies** with exponential backoff and jitter, classified so
//!   permanent failures never burn the budget
//! - **Idempotency keys** mined from the payload or minted as UUIDs, injected
//!   on every write
//! - **Read-after-write verification** through a detail read with a one-row
//!   list fallback, and absence checks after deletes
//! - **Injected transport and sleeper seams** for deterministic tests
//!
//! ## Quick Start
//!
//! ```rust
//! use surecall::{
//!     CallOptions, ClientConfig, EndpointDescriptor, Method, Operation, Request,
//!     ResourceCatalog, ResourceClient, Transport, TransportError,
//! };
//! use async_trait::async_trait;
//! use serde_json::{json, Value};
//!
//! struct StaticTransport;
//!
//! #[async_trait]
//! impl Transport for StaticTransport {
//!     async fn send(&self, _request: Request) -> Result<Value, TransportError> {
//!         Ok(json!({ "errcode": 0, "data": { "id": 1, "number": "SO-001" } }))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), surecall::ApiError> {
//!     let endpoints = vec![
//!         EndpointDescriptor {
//!             operation: Operation::WriteUpsert,
//!             title: "customer save".into(),
//!             method: Method::Post,
//!             path_or_url: "/v2/bd/customer".into(),
//!             is_relative: true,
//!             doc_source: None,
//!         },
//!         EndpointDescriptor {
//!             operation: Operation::ReadDetail,
//!             title: "customer detail".into(),
//!             method: Method::Get,
//!             path_or_url: "/v2/bd/customer_detail".into(),
//!             is_relative: true,
//!             doc_source: None,
//!         },
//!     ];
//!
//!     let client = ResourceClient::new(
//!         ResourceCatalog::build(&endpoints),
//!         StaticTransport,
//!         ClientConfig::new("https://api.example.com"),
//!     );
//!
//!     let resp = client
//!         .save(json!({ "name": "ACME", "number": "SO-001" }), &CallOptions::default())
//!         .await?;
//!     assert_eq!(resp["data"]["id"], 1);
//!     Ok(())
//! }
//! ```

pub mod backoff;
pub mod catalog;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod headers;
pub mod idempotency;
pub mod prelude;
pub mod response;
pub mod retry;
pub mod selector;
pub mod sleeper;
pub mod transport;
pub mod url;

// Re-exports
pub use catalog::ResourceCatalog;
pub use client::{DetailQuery, ListQuery, ResourceClient, VerificationCriteria};
pub use config::{CallOptions, ClientConfig};
pub use endpoint::{EndpointDescriptor, Method, Operation};
pub use error::{ApiError, TransportError};
pub use headers::Headers;
pub use retry::{RetryPolicy, RetryPolicyBuilder};
pub use selector::Selection;
pub use sleeper::{InstantSleeper, Sleeper, TokioSleeper, TrackingSleeper};
pub use transport::{Request, Transport};
