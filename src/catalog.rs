//! Immutable per-resource endpoint catalog.
//!
//! Built once at client construction via the selector, then read-only: safe
//! for unlimited concurrent readers without locking. At most one primary per
//! operation; an operation absent from the catalog means the corresponding
//! resource method is not available.

use crate::endpoint::{EndpointDescriptor, Operation};
use crate::selector::choose_primary;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct Elected {
    primary: EndpointDescriptor,
    alternates: Vec<EndpointDescriptor>,
}

/// Mapping from operation to its elected endpoint, plus the losing candidates
/// retained for debugging.
#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog {
    entries: BTreeMap<Operation, Elected>,
}

impl ResourceCatalog {
    /// Run the election for every operation over the tagged endpoint set.
    pub fn build(endpoints: &[EndpointDescriptor]) -> Self {
        let mut entries = BTreeMap::new();
        for op in Operation::ALL {
            let selection = choose_primary(endpoints, op);
            if let Some(primary) = selection.primary {
                let alternates = selection.candidates.into_iter().skip(1).collect();
                entries.insert(op, Elected { primary, alternates });
            }
        }
        Self { entries }
    }

    /// The elected primary for `op`, if any candidate existed.
    pub fn get(&self, op: Operation) -> Option<&EndpointDescriptor> {
        self.entries.get(&op).map(|e| &e.primary)
    }

    pub fn has(&self, op: Operation) -> bool {
        self.entries.contains_key(&op)
    }

    /// Candidates that lost the election for `op`, in rank order. Never
    /// invoked automatically; exposed for observability.
    pub fn alternates(&self, op: Operation) -> &[EndpointDescriptor] {
        self.entries.get(&op).map(|e| e.alternates.as_slice()).unwrap_or(&[])
    }

    /// Operations with an elected endpoint, in stable order.
    pub fn operations(&self) -> impl Iterator<Item = Operation> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::Method;

    fn ep(op: Operation, title: &str, method: Method, path: &str) -> EndpointDescriptor {
        EndpointDescriptor {
            operation: op,
            title: title.to_string(),
            method,
            path_or_url: path.to_string(),
            is_relative: true,
            doc_source: None,
        }
    }

    #[test]
    fn builds_one_primary_per_operation() {
        let endpoints = vec![
            ep(Operation::ReadList, "customer list", Method::Get, "/v2/bd/customer_list"),
            ep(Operation::ReadList, "customer query legacy", Method::Post, "/v1/bd/customer_query"),
            ep(Operation::WriteUpsert, "customer save", Method::Post, "/v2/bd/customer"),
        ];
        let catalog = ResourceCatalog::build(&endpoints);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(Operation::ReadList).unwrap().title, "customer list");
        assert_eq!(catalog.alternates(Operation::ReadList).len(), 1);
        assert!(catalog.has(Operation::WriteUpsert));
        assert!(catalog.alternates(Operation::WriteUpsert).is_empty());
    }

    #[test]
    fn absent_operation_is_not_exposed() {
        let catalog = ResourceCatalog::build(&[ep(
            Operation::ReadList,
            "customer list",
            Method::Get,
            "/v2/bd/customer_list",
        )]);
        assert!(catalog.get(Operation::WriteDelete).is_none());
        assert!(!catalog.has(Operation::WriteDelete));
        assert!(catalog.alternates(Operation::WriteDelete).is_empty());
    }

    #[test]
    fn empty_input_builds_empty_catalog() {
        let catalog = ResourceCatalog::build(&[]);
        assert!(catalog.is_empty());
        assert_eq!(catalog.operations().count(), 0);
    }

    #[test]
    fn operations_iterate_in_stable_order() {
        let endpoints = vec![
            ep(Operation::WriteDelete, "customer delete", Method::Post, "/v2/bd/customer_rm"),
            ep(Operation::ReadList, "customer list", Method::Get, "/v2/bd/customer_list"),
        ];
        let catalog = ResourceCatalog::build(&endpoints);
        let ops: Vec<Operation> = catalog.operations().collect();
        assert_eq!(ops, vec![Operation::ReadList, Operation::WriteDelete]);
    }
}
