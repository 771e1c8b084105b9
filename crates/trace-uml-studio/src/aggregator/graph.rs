//! Aggregated, cross-trace view of services and their interactions.

use crate::model::{Metadata, TagValue};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Caller -> callee -> operations invoked
pub type CallMatrix = BTreeMap<String, BTreeMap<String, BTreeSet<String>>>;

/// Global service graph built from one or more traces
///
/// **Public** - consumed by diagram emitters, topology inference and reports
///
/// Ordered collections keep every derived diagram and report deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceGraph {
    /// Every service seen in any span
    pub services: BTreeSet<String>,

    /// Service -> raw operation names it handled
    pub operations: BTreeMap<String, BTreeSet<String>>,

    /// Service -> downstream services it called
    pub dependencies: BTreeMap<String, BTreeSet<String>>,

    /// Service -> flattened process tags (last write wins)
    pub metadata: BTreeMap<String, Metadata>,

    /// Operation-level call matrix
    pub calls: CallMatrix,
}

impl ServiceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_operation(&mut self, service: &str, operation: &str) {
        self.services.insert(service.to_string());
        self.operations
            .entry(service.to_string())
            .or_default()
            .insert(operation.to_string());
    }

    /// Merge tags into a service's metadata; `None` values are ignored
    pub fn merge_metadata<'a, I>(&mut self, service: &str, tags: I)
    where
        I: IntoIterator<Item = (&'a str, Option<&'a TagValue>)>,
    {
        let entry = self.metadata.entry(service.to_string()).or_default();
        for (key, value) in tags {
            if let Some(value) = value {
                entry.insert(key.to_string(), value.clone());
            }
        }
    }

    /// Record a cross-service call; same-service pairs are ignored
    ///
    /// Returns `true` when the edge was recorded.
    pub fn record_call(&mut self, caller: &str, callee: &str, operation: &str) -> bool {
        if caller == callee {
            return false;
        }

        self.dependencies
            .entry(caller.to_string())
            .or_default()
            .insert(callee.to_string());
        self.calls
            .entry(caller.to_string())
            .or_default()
            .entry(callee.to_string())
            .or_default()
            .insert(operation.to_string());
        true
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Number of distinct caller -> callee edges
    pub fn edge_count(&self) -> usize {
        self.dependencies.values().map(BTreeSet::len).sum()
    }

    /// Number of distinct (service, operation) pairs
    pub fn operation_count(&self) -> usize {
        self.operations.values().map(BTreeSet::len).sum()
    }
}
