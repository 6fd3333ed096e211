//! Endpoint descriptors and the logical operations they claim.
//!
//! Raw API documentation is tagged upstream into `EndpointDescriptor` records.
//! Several descriptors may claim the same [`Operation`] for one resource; the
//! selector elects exactly one primary per operation (see [`crate::selector`]).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical operation a raw API route implements.
///
/// The serialized form matches the tagger's `namespace:verb` convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Operation {
    #[serde(rename = "read:list")]
    ReadList,
    #[serde(rename = "read:detail")]
    ReadDetail,
    #[serde(rename = "write:upsert")]
    WriteUpsert,
    #[serde(rename = "write:create")]
    WriteCreate,
    #[serde(rename = "write:update")]
    WriteUpdate,
    #[serde(rename = "write:delete")]
    WriteDelete,
    #[serde(rename = "workflow:submit")]
    WorkflowSubmit,
    #[serde(rename = "workflow:audit")]
    WorkflowAudit,
    #[serde(rename = "workflow:unaudit")]
    WorkflowUnaudit,
    #[serde(rename = "workflow:cancel")]
    WorkflowCancel,
    #[serde(rename = "workflow:close")]
    WorkflowClose,
    #[serde(rename = "workflow:open")]
    WorkflowOpen,
    #[serde(rename = "workflow:enable")]
    WorkflowEnable,
    #[serde(rename = "workflow:disable")]
    WorkflowDisable,
}

impl Operation {
    /// Every operation, in catalog-build order.
    pub const ALL: [Operation; 14] = [
        Operation::ReadList,
        Operation::ReadDetail,
        Operation::WriteUpsert,
        Operation::WriteCreate,
        Operation::WriteUpdate,
        Operation::WriteDelete,
        Operation::WorkflowSubmit,
        Operation::WorkflowAudit,
        Operation::WorkflowUnaudit,
        Operation::WorkflowCancel,
        Operation::WorkflowClose,
        Operation::WorkflowOpen,
        Operation::WorkflowEnable,
        Operation::WorkflowDisable,
    ];

    pub fn is_read(self) -> bool {
        matches!(self, Operation::ReadList | Operation::ReadDetail)
    }

    pub fn is_write(self) -> bool {
        matches!(
            self,
            Operation::WriteUpsert
                | Operation::WriteCreate
                | Operation::WriteUpdate
                | Operation::WriteDelete
        )
    }

    pub fn is_workflow(self) -> bool {
        !self.is_read() && !self.is_write()
    }

    /// Writes and workflow actions share idempotency and retry treatment.
    pub fn is_write_or_workflow(self) -> bool {
        self.is_write() || self.is_workflow()
    }

    /// The tagger's `namespace:verb` string.
    pub fn as_tag(self) -> &'static str {
        match self {
            Operation::ReadList => "read:list",
            Operation::ReadDetail => "read:detail",
            Operation::WriteUpsert => "write:upsert",
            Operation::WriteCreate => "write:create",
            Operation::WriteUpdate => "write:update",
            Operation::WriteDelete => "write:delete",
            Operation::WorkflowSubmit => "workflow:submit",
            Operation::WorkflowAudit => "workflow:audit",
            Operation::WorkflowUnaudit => "workflow:unaudit",
            Operation::WorkflowCancel => "workflow:cancel",
            Operation::WorkflowClose => "workflow:close",
            Operation::WorkflowOpen => "workflow:open",
            Operation::WorkflowEnable => "workflow:enable",
            Operation::WorkflowDisable => "workflow:disable",
        }
    }

    /// Short verb used in error messages and logs.
    pub fn action_name(self) -> &'static str {
        match self {
            Operation::ReadList => "list",
            Operation::ReadDetail => "detail",
            Operation::WriteUpsert => "save",
            Operation::WriteCreate => "create",
            Operation::WriteUpdate => "update",
            Operation::WriteDelete => "delete",
            Operation::WorkflowSubmit => "submit",
            Operation::WorkflowAudit => "audit",
            Operation::WorkflowUnaudit => "unaudit",
            Operation::WorkflowCancel => "cancel",
            Operation::WorkflowClose => "close",
            Operation::WorkflowOpen => "open",
            Operation::WorkflowEnable => "enable",
            Operation::WorkflowDisable => "disable",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// HTTP verb carried by an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    #[serde(rename = "GET")]
    Get,
    #[serde(rename = "POST")]
    Post,
    #[serde(rename = "PUT")]
    Put,
    #[serde(rename = "PATCH")]
    Patch,
    #[serde(rename = "DELETE")]
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// Verbs that carry a request body (and therefore a Content-Type).
    pub fn has_body(self) -> bool {
        matches!(self, Method::Post | Method::Put | Method::Patch)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tagged API route. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    /// Logical operation this route claims.
    pub operation: Operation,
    /// Human title from the source documentation.
    pub title: String,
    /// HTTP verb.
    pub method: Method,
    /// Absolute URL or host-relative path.
    #[serde(rename = "pathOrUrl")]
    pub path_or_url: String,
    /// Whether `path_or_url` is relative to the configured host.
    #[serde(rename = "isRelative", default)]
    pub is_relative: bool,
    /// Provenance pointer into the source documentation.
    #[serde(rename = "docSource", default)]
    pub doc_source: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_families_partition() {
        for op in Operation::ALL {
            let claims =
                [op.is_read(), op.is_write(), op.is_workflow()].iter().filter(|b| **b).count();
            assert_eq!(claims, 1, "{op} must belong to exactly one family");
        }
    }

    #[test]
    fn write_or_workflow_excludes_reads() {
        assert!(!Operation::ReadList.is_write_or_workflow());
        assert!(!Operation::ReadDetail.is_write_or_workflow());
        assert!(Operation::WriteUpsert.is_write_or_workflow());
        assert!(Operation::WorkflowSubmit.is_write_or_workflow());
    }

    #[test]
    fn operation_tag_round_trips_through_serde() {
        for op in Operation::ALL {
            let json = serde_json::to_string(&op).unwrap();
            assert_eq!(json, format!("\"{}\"", op.as_tag()));
            let back: Operation = serde_json::from_str(&json).unwrap();
            assert_eq!(back, op);
        }
    }

    #[test]
    fn body_methods() {
        assert!(Method::Post.has_body());
        assert!(Method::Put.has_body());
        assert!(Method::Patch.has_body());
        assert!(!Method::Get.has_body());
        assert!(!Method::Delete.has_body());
    }

    #[test]
    fn descriptor_deserializes_from_tagger_output() {
        let ep: EndpointDescriptor = serde_json::from_str(
            r#"{
                "operation": "write:upsert",
                "title": "customer save",
                "method": "POST",
                "pathOrUrl": "/v2/bd/customer",
                "isRelative": true
            }"#,
        )
        .unwrap();
        assert_eq!(ep.operation, Operation::WriteUpsert);
        assert_eq!(ep.method, Method::Post);
        assert!(ep.doc_source.is_none());
    }
}
