//! Convenient re-exports for common Surecall types.
pub use crate::{
    backoff::{backoff_delay, JitterSource, DEFAULT_BASE_DELAY, MAX_BACKOFF},
    catalog::ResourceCatalog,
    client::{DetailQuery, ListQuery, ResourceClient, VerificationCriteria},
    config::{CallOptions, ClientConfig},
    endpoint::{EndpointDescriptor, Method, Operation},
    error::{ApiError, TransportError},
    headers::Headers,
    idempotency::{resolve_idempotency_key, uuid_token_source, TokenSource},
    retry::{should_retry, RetryPolicy, RetryPolicyBuilder, DEFAULT_MAX_RETRIES},
    selector::{choose_primary, score_endpoint, Selection},
    sleeper::{InstantSleeper, Sleeper, TokioSleeper, TrackingSleeper},
    transport::{Request, Transport},
};
