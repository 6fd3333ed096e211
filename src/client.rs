//! Resource client: catalog-driven calls with write verification.
//!
//! One logical write call moves through `Calling` (transport + retry for
//! writes), a business-success assertion, then `Verifying`: a detail read
//! confirmed non-empty, falling back to a one-row list probe. Deletes verify
//! the inverse, absence. The write always completes before any verification
//! read is issued, and the reads run sequentially, detail before list.
//!
//! The catalog is frozen at construction; everything else is call-local, so
//! a client is safe to share across tasks. Safety against duplicate
//! server-side effects from caller-initiated retries comes from idempotency
//! keys, not locks.

use crate::catalog::ResourceCatalog;
use crate::config::{CallOptions, ClientConfig};
use crate::endpoint::{EndpointDescriptor, Method, Operation};
use crate::error::ApiError;
use crate::headers::{build_headers, mask_sensitive_headers, HeaderSpec};
use crate::response::{assert_business_success, extract_data, has_visible_data};
use crate::retry::RetryPolicy;
use crate::transport::{Request, Transport};
use crate::url::build_url;
use serde_json::{json, Map, Value};

const ID_KEYS: [&str; 4] = ["id", "Id", "FID", "fid"];
const NUMBER_KEYS: [&str; 10] =
    ["number", "Number", "no", "No", "code", "Code", "billNo", "bill_no", "编码", "单号"];

/// Identifiers used to confirm a write became visible. Derived per call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerificationCriteria {
    pub id: Option<Value>,
    pub number: Option<Value>,
}

impl VerificationCriteria {
    fn is_empty(&self) -> bool {
        self.id.is_none() && self.number.is_none()
    }
}

/// Paged list query; filters pass through to the endpoint.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub page: u64,
    pub page_size: u64,
    /// Object of endpoint-specific filters, or `Null` for none.
    pub filters: Value,
    pub updated_after: Option<String>,
    pub updated_before: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self { page: 1, page_size: 50, filters: Value::Null, updated_after: None, updated_before: None }
    }
}

/// Detail lookup selector; at least one of `id`/`number` is required.
#[derive(Debug, Clone, Default)]
pub struct DetailQuery {
    pub id: Option<Value>,
    pub number: Option<Value>,
}

impl DetailQuery {
    pub fn by_id(id: impl Into<Value>) -> Self {
        Self { id: Some(id.into()), number: None }
    }

    pub fn by_number(number: impl Into<Value>) -> Self {
        Self { id: None, number: Some(number.into()) }
    }
}

/// Client for one logical resource, bound to an elected endpoint catalog and
/// an injected transport.
#[derive(Debug)]
pub struct ResourceClient<T> {
    catalog: ResourceCatalog,
    transport: T,
    config: ClientConfig,
    retry: RetryPolicy,
}

impl<T: Transport> ResourceClient<T> {
    pub fn new(catalog: ResourceCatalog, transport: T, config: ClientConfig) -> Self {
        let retry = RetryPolicy::builder()
            .max_retries(config.max_retries)
            .base_delay(config.base_delay)
            .build();
        Self { catalog, transport, config, retry }
    }

    /// Replace the retry policy, e.g. to inject a test sleeper or jitter.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }

    /// Whether the catalog elected an endpoint for `op`.
    pub fn supports(&self, op: Operation) -> bool {
        self.catalog.has(op)
    }

    fn endpoint(&self, op: Operation) -> Result<&EndpointDescriptor, ApiError> {
        self.catalog
            .get(op)
            .ok_or_else(|| ApiError::Configuration(format!("no endpoint configured for {op}")))
    }

    /// Resolved URL for an operation, without calling it.
    pub fn request_url(&self, op: Operation, opts: &CallOptions) -> Result<String, ApiError> {
        let ep = self.endpoint(op)?;
        build_url(
            &self.config.host,
            &ep.path_or_url,
            opts.override_host.unwrap_or(self.config.override_host),
        )
    }

    async fn call(
        &self,
        op: Operation,
        payload: Value,
        opts: &CallOptions,
    ) -> Result<Value, ApiError> {
        let ep = self.endpoint(op)?;
        let url = build_url(
            &self.config.host,
            &ep.path_or_url,
            opts.override_host.unwrap_or(self.config.override_host),
        )?;
        let is_write = op.is_write_or_workflow();

        let headers = build_headers(&HeaderSpec {
            default_headers: &self.config.default_headers,
            extra_headers: &opts.headers,
            is_write,
            method: ep.method,
            idempotency_key: opts.idempotency_key.as_deref(),
            idempotency_timeout_secs: opts
                .idempotency_timeout_secs
                .or(self.config.idempotency_timeout_secs),
            payload: &payload,
            enable_idempotency: self.config.enable_idempotency && !opts.disable_idempotency,
            token_source: &self.config.token_source,
        });

        tracing::debug!(
            action = %op,
            method = %ep.method,
            url = %url,
            headers = ?mask_sensitive_headers(&headers),
            "sending request"
        );

        let request = if ep.method == Method::Get {
            Request { method: ep.method, url, params: payload, body: Value::Null, headers }
        } else {
            Request { method: ep.method, url, params: opts.params.clone(), body: payload, headers }
        };

        let resp = if is_write {
            self.retry.execute(|| self.transport.send(request.clone())).await?
        } else {
            self.transport.send(request).await?
        };
        Ok(resp)
    }

    /// Paged read. Never retried and never verified.
    pub async fn list(&self, query: ListQuery, opts: &CallOptions) -> Result<Value, ApiError> {
        let mut payload = match &query.filters {
            Value::Object(map) => map.clone(),
            Value::Null => Map::new(),
            _ => return Err(ApiError::Configuration("list filters must be an object".into())),
        };
        payload.insert("page".into(), json!(query.page));
        payload.insert("pageSize".into(), json!(query.page_size));
        if let Some(after) = &query.updated_after {
            payload.insert("updatedAfter".into(), json!(after));
        }
        if let Some(before) = &query.updated_before {
            payload.insert("updatedBefore".into(), json!(before));
        }
        self.call(Operation::ReadList, Value::Object(payload), opts).await
    }

    /// Single-record read by id and/or number.
    pub async fn detail(&self, query: DetailQuery, opts: &CallOptions) -> Result<Value, ApiError> {
        if query.id.is_none() && query.number.is_none() {
            return Err(ApiError::Configuration("detail requires id or number".into()));
        }
        let mut payload = Map::new();
        if let Some(id) = query.id {
            payload.insert("id".into(), id);
        }
        if let Some(number) = query.number {
            payload.insert("number".into(), number);
        }
        self.call(Operation::ReadDetail, Value::Object(payload), opts).await
    }

    /// Upsert, verified by read-after-write.
    pub async fn save(&self, model: Value, opts: &CallOptions) -> Result<Value, ApiError> {
        self.write_and_verify(Operation::WriteUpsert, model, VerificationCriteria::default(), opts)
            .await
    }

    /// Create, verified by read-after-write.
    pub async fn create(&self, model: Value, opts: &CallOptions) -> Result<Value, ApiError> {
        self.write_and_verify(Operation::WriteCreate, model, VerificationCriteria::default(), opts)
            .await
    }

    /// Update by id; `id` is merged into the payload. Verified.
    pub async fn update(
        &self,
        id: impl Into<Value>,
        model: Value,
        opts: &CallOptions,
    ) -> Result<Value, ApiError> {
        let id = id.into();
        let mut payload = match model {
            Value::Object(map) => map,
            _ => return Err(ApiError::Configuration("update payload must be an object".into())),
        };
        payload.insert("id".into(), id.clone());
        let overrides = VerificationCriteria { id: Some(id), number: None };
        self.write_and_verify(Operation::WriteUpdate, Value::Object(payload), overrides, opts).await
    }

    /// Delete by id, verified by confirmed absence.
    pub async fn delete(&self, id: impl Into<Value>, opts: &CallOptions) -> Result<Value, ApiError> {
        let id = id.into();
        let resp = self.call(Operation::WriteDelete, json!({ "id": id.clone() }), opts).await?;
        assert_business_success("delete", &resp)?;
        self.verify_delete("delete", &id, opts).await?;
        Ok(resp)
    }

    /// Run a workflow action against one record, verified like a write.
    pub async fn workflow(
        &self,
        op: Operation,
        id: impl Into<Value>,
        opts: &CallOptions,
    ) -> Result<Value, ApiError> {
        if !op.is_workflow() {
            return Err(ApiError::Configuration(format!("{op} is not a workflow action")));
        }
        let id = id.into();
        let action = op.action_name();
        let resp = self.call(op, json!({ "id": id.clone() }), opts).await?;
        assert_business_success(action, &resp)?;
        let criteria = VerificationCriteria { id: Some(id), number: None };
        self.verify_after_write(action, &criteria, opts).await?;
        Ok(resp)
    }

    pub async fn submit(&self, id: impl Into<Value>, opts: &CallOptions) -> Result<Value, ApiError> {
        self.workflow(Operation::WorkflowSubmit, id, opts).await
    }

    pub async fn audit(&self, id: impl Into<Value>, opts: &CallOptions) -> Result<Value, ApiError> {
        self.workflow(Operation::WorkflowAudit, id, opts).await
    }

    pub async fn unaudit(&self, id: impl Into<Value>, opts: &CallOptions) -> Result<Value, ApiError> {
        self.workflow(Operation::WorkflowUnaudit, id, opts).await
    }

    pub async fn cancel(&self, id: impl Into<Value>, opts: &CallOptions) -> Result<Value, ApiError> {
        self.workflow(Operation::WorkflowCancel, id, opts).await
    }

    pub async fn close(&self, id: impl Into<Value>, opts: &CallOptions) -> Result<Value, ApiError> {
        self.workflow(Operation::WorkflowClose, id, opts).await
    }

    pub async fn open(&self, id: impl Into<Value>, opts: &CallOptions) -> Result<Value, ApiError> {
        self.workflow(Operation::WorkflowOpen, id, opts).await
    }

    pub async fn enable(&self, id: impl Into<Value>, opts: &CallOptions) -> Result<Value, ApiError> {
        self.workflow(Operation::WorkflowEnable, id, opts).await
    }

    pub async fn disable(&self, id: impl Into<Value>, opts: &CallOptions) -> Result<Value, ApiError> {
        self.workflow(Operation::WorkflowDisable, id, opts).await
    }

    async fn write_and_verify(
        &self,
        op: Operation,
        model: Value,
        overrides: VerificationCriteria,
        opts: &CallOptions,
    ) -> Result<Value, ApiError> {
        let action = op.action_name();
        if !model.is_object() {
            return Err(ApiError::Configuration(format!("{action} payload must be an object")));
        }
        let resp = self.call(op, model.clone(), opts).await?;
        assert_business_success(action, &resp)?;
        let criteria = infer_criteria(&resp, &model, &overrides);
        self.verify_after_write(action, &criteria, opts).await?;
        Ok(resp)
    }

    /// Confirm a write became externally visible: detail first, then a
    /// one-row list probe filtered by whichever of id/number are known.
    ///
    /// The list fallback treats any non-empty result under the loose filters
    /// as confirmation; a pre-existing record with the same number could
    /// satisfy it under concurrent writes.
    async fn verify_after_write(
        &self,
        action: &str,
        criteria: &VerificationCriteria,
        opts: &CallOptions,
    ) -> Result<(), ApiError> {
        if self.catalog.has(Operation::ReadDetail) && !criteria.is_empty() {
            match self.checked_detail(action, criteria, opts).await {
                Ok(resp) if has_visible_data(&resp) => return Ok(()),
                Ok(_) => {
                    tracing::debug!(action, step = "detail", "verification read returned no data");
                }
                Err(err) => {
                    tracing::debug!(action, step = "detail", error = %err, "verification read failed");
                }
            }
        }
        if self.catalog.has(Operation::ReadList) {
            let resp = self.verification_list(criteria, opts).await?;
            assert_business_success(&format!("{action}:list"), &resp)?;
            if has_visible_data(&resp) {
                return Ok(());
            }
        }
        Err(ApiError::Verification {
            action: action.to_string(),
            reason: "read-after-write verification failed".into(),
        })
    }

    /// Confirm a delete by absence: a failing or empty detail read verifies;
    /// visible data is fatal. Without a detail endpoint the list probe must
    /// come back empty.
    async fn verify_delete(&self, action: &str, id: &Value, opts: &CallOptions) -> Result<(), ApiError> {
        if self.catalog.has(Operation::ReadDetail) {
            let criteria = VerificationCriteria { id: Some(id.clone()), number: None };
            return match self.checked_detail(action, &criteria, opts).await {
                Ok(resp) if has_visible_data(&resp) => Err(ApiError::Verification {
                    action: action.to_string(),
                    reason: "delete verification failed: resource still visible in detail".into(),
                }),
                Ok(_) => Ok(()),
                Err(err) => {
                    tracing::debug!(action, step = "detail", error = %err, "treating detail failure as absence");
                    Ok(())
                }
            };
        }
        if self.catalog.has(Operation::ReadList) {
            let criteria = VerificationCriteria { id: Some(id.clone()), number: None };
            let resp = self.verification_list(&criteria, opts).await?;
            assert_business_success(&format!("{action}:list"), &resp)?;
            return if has_visible_data(&resp) {
                Err(ApiError::Verification {
                    action: action.to_string(),
                    reason: "delete verification failed: resource still visible in list".into(),
                })
            } else {
                Ok(())
            };
        }
        Err(ApiError::Configuration(
            "delete verification needs a detail or list endpoint".into(),
        ))
    }

    async fn checked_detail(
        &self,
        action: &str,
        criteria: &VerificationCriteria,
        opts: &CallOptions,
    ) -> Result<Value, ApiError> {
        let resp = self
            .detail(DetailQuery { id: criteria.id.clone(), number: criteria.number.clone() }, opts)
            .await?;
        assert_business_success(&format!("{action}:detail"), &resp)?;
        Ok(resp)
    }

    async fn verification_list(
        &self,
        criteria: &VerificationCriteria,
        opts: &CallOptions,
    ) -> Result<Value, ApiError> {
        let mut filters = Map::new();
        if let Some(number) = &criteria.number {
            filters.insert("number".into(), number.clone());
        }
        if let Some(id) = &criteria.id {
            filters.insert("id".into(), id.clone());
        }
        let query = ListQuery { page: 1, page_size: 1, filters: Value::Object(filters), ..ListQuery::default() };
        self.list(query, opts).await
    }
}

/// True for values usable as identifiers: not null, not the empty string.
fn field_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// First present member of `value` under `keys`, tried in order.
fn pick_field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let map = value.as_object()?;
    keys.iter().find_map(|key| map.get(*key).filter(|v| field_present(v)))
}

/// First non-empty value in preference order.
fn pick_first<'a>(options: impl IntoIterator<Item = Option<&'a Value>>) -> Option<&'a Value> {
    options.into_iter().flatten().next()
}

/// Number pick for the raw response envelope. `code` at the envelope root is
/// the business error-code slot, never an identifier, so it is excluded here.
fn pick_envelope_number(resp: &Value) -> Option<&Value> {
    let map = resp.as_object()?;
    NUMBER_KEYS
        .iter()
        .filter(|key| !key.eq_ignore_ascii_case("code"))
        .find_map(|key| map.get(*key).filter(|v| field_present(v)))
}

/// Derive verification criteria: response-declared fields win, then the
/// original payload, then caller-supplied overrides.
fn infer_criteria(resp: &Value, payload: &Value, overrides: &VerificationCriteria) -> VerificationCriteria {
    let data = extract_data(resp);
    let data_number = if std::ptr::eq(data, resp) {
        pick_envelope_number(data)
    } else {
        pick_field(data, &NUMBER_KEYS)
    };
    let id = pick_first([
        pick_field(data, &ID_KEYS),
        pick_field(resp, &ID_KEYS),
        pick_field(payload, &ID_KEYS),
        overrides.id.as_ref(),
    ])
    .cloned();
    let number = pick_first([
        data_number,
        pick_envelope_number(resp),
        pick_field(payload, &NUMBER_KEYS),
        overrides.number.as_ref(),
    ])
    .cloned();
    VerificationCriteria { id, number }
}
