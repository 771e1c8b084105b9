//! Deployment topology inference.
//!
//! Real-world trace metadata varies by platform and instrumentation library.
//! Each service is placed on exactly one inferred node using the ordered
//! rules in [`rules::NODE_RULES`]: Kubernetes pod, Docker container,
//! host/VM/cloud identifiers, then an opaque hash of the metadata.

pub mod rules;

use crate::aggregator::{ServiceGraph, TraceAggregator};
use crate::model::Metadata;
use crate::utils::config::NAMESPACE_KEYS;
use log::{debug, info};
use rules::{first_present, hashed_node, NODE_RULES, UNKNOWN_NODE};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Service -> node id
pub type NodeAssignment = BTreeMap<String, String>;

/// Unordered pair of distinct nodes linked by at least one service call
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodePair {
    pub first: String,
    pub second: String,
}

impl NodePair {
    /// Build a pair; the two ends are stored in lexical order
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub fn contains(&self, node: &str) -> bool {
        self.first == node || self.second == node
    }
}

/// Infer the node a service runs on
///
/// **Public** - main entry point for node inference
pub fn infer_node(metadata: &Metadata) -> String {
    for rule in NODE_RULES {
        if let Some(node) = (rule.apply)(metadata) {
            debug!("Node rule '{}' matched -> {}", rule.name, node);
            return node;
        }
    }
    hashed_node(metadata)
}

/// Group services by inferred node
///
/// # Returns
/// Node id -> services deployed there
pub fn infer_nodes(metadata: &BTreeMap<String, Metadata>) -> BTreeMap<String, BTreeSet<String>> {
    let mut nodes: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for (service, meta) in metadata {
        nodes
            .entry(infer_node(meta))
            .or_default()
            .insert(service.clone());
    }
    nodes
}

/// `namespace`, else `k8s.namespace`
pub fn infer_namespace(metadata: &Metadata) -> Option<String> {
    first_present(metadata, NAMESPACE_KEYS)
}

/// Communication paths between nodes
///
/// Every dependency edge whose ends sit on different nodes yields one
/// unordered pair; direction and multiplicity are collapsed. Services
/// missing from `assignment` are ignored.
pub fn derive_paths(
    dependencies: &BTreeMap<String, BTreeSet<String>>,
    assignment: &NodeAssignment,
) -> BTreeSet<NodePair> {
    let mut paths = BTreeSet::new();
    for (from_service, to_services) in dependencies {
        let Some(from_node) = assignment.get(from_service) else {
            continue;
        };
        for to_service in to_services {
            match assignment.get(to_service) {
                Some(to_node) if to_node != from_node => {
                    paths.insert(NodePair::new(from_node.as_str(), to_node.as_str()));
                }
                _ => {}
            }
        }
    }
    paths
}

/// Complete inferred deployment view
///
/// **Public** - consumed by the deployment diagram and topology report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentTopology {
    /// Service -> node
    pub assignment: NodeAssignment,

    /// Node -> services
    pub nodes: BTreeMap<String, BTreeSet<String>>,

    /// Node -> namespace label, only for nodes that have one
    pub namespaces: BTreeMap<String, String>,

    pub paths: BTreeSet<NodePair>,
}

impl DeploymentTopology {
    pub fn from_aggregator(aggregator: &TraceAggregator<'_>) -> Self {
        Self::from_graph(aggregator.graph())
    }

    /// Every service in the graph is assigned; services with no metadata
    /// land on `Node-Unknown`
    pub fn from_graph(graph: &ServiceGraph) -> Self {
        let mut topology = Self::default();

        for service in &graph.services {
            let (node, namespace) = match graph.metadata.get(service) {
                Some(meta) => (infer_node(meta), infer_namespace(meta)),
                None => (UNKNOWN_NODE.to_string(), None),
            };

            // Services iterate in lexical order, so the first namespace wins
            if let Some(ns) = namespace {
                topology.namespaces.entry(node.clone()).or_insert(ns);
            }
            topology
                .nodes
                .entry(node.clone())
                .or_default()
                .insert(service.clone());
            topology.assignment.insert(service.clone(), node);
        }

        topology.paths = derive_paths(&graph.dependencies, &topology.assignment);

        info!(
            "Inferred {} nodes and {} communication paths for {} services",
            topology.nodes.len(),
            topology.paths.len(),
            topology.assignment.len()
        );
        topology
    }

    pub fn node_for(&self, service: &str) -> Option<&str> {
        self.assignment.get(service).map(String::as_str)
    }

    pub fn namespace_for(&self, node: &str) -> Option<&str> {
        self.namespaces.get(node).map(String::as_str)
    }
}
