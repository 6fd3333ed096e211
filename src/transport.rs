//! Injected transport seam.
//!
//! The client never talks to the network itself; it hands a [`Request`]
//! descriptor to whatever [`Transport`] the caller injects and receives a
//! parsed JSON response or a [`TransportError`]. Timeout enforcement belongs
//! to the transport; timeout failures classify as retryable network errors.

use crate::endpoint::Method;
use crate::error::TransportError;
use crate::headers::Headers;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Wire request descriptor. Owned by one call in progress, never shared.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: String,
    /// Query parameters. For GET calls this carries the payload.
    pub params: Value,
    /// Request body. `Null` for GET calls.
    pub body: Value,
    pub headers: Headers,
}

/// Request executor injected at client construction.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> Result<Value, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: Request) -> Result<Value, TransportError> {
        (**self).send(request).await
    }
}
