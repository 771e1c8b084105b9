//! Topology report schema.

use crate::aggregator::{ServiceGraph, TraceAggregator};
use crate::topology::{DeploymentTopology, NodePair};
use crate::utils::config::REPORT_SCHEMA_VERSION;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Machine-readable summary of one generation run
///
/// **Public** - written with `--report`, checked by `validate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyReport {
    /// Report schema version
    pub version: String,

    /// RFC 3339 timestamp
    pub generated_at: String,

    pub trace_count: usize,

    pub graph: ServiceGraph,

    /// Service -> node
    pub node_assignment: BTreeMap<String, String>,

    /// Node -> services
    pub nodes: BTreeMap<String, BTreeSet<String>>,

    #[serde(default)]
    pub node_namespaces: BTreeMap<String, String>,

    #[serde(default)]
    pub communication_paths: BTreeSet<NodePair>,
}

impl TopologyReport {
    pub fn new(trace_count: usize, graph: ServiceGraph, topology: DeploymentTopology) -> Self {
        Self {
            version: REPORT_SCHEMA_VERSION.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            trace_count,
            graph,
            node_assignment: topology.assignment,
            nodes: topology.nodes,
            node_namespaces: topology.namespaces,
            communication_paths: topology.paths,
        }
    }

    /// Build a report from an aggregator and its inferred topology
    ///
    /// Consumes the aggregator so its graph moves into the report.
    pub fn from_aggregator(aggregator: TraceAggregator<'_>) -> Self {
        let topology = DeploymentTopology::from_aggregator(&aggregator);
        let trace_count = aggregator.traces().len();
        Self::new(trace_count, aggregator.into_graph(), topology)
    }

    pub fn service_count(&self) -> usize {
        self.graph.services.len()
    }

    /// Every service appears on exactly one node, and every node lists
    /// only services assigned to it
    pub fn is_consistent(&self) -> bool {
        let assigned: BTreeSet<&String> = self.node_assignment.keys().collect();
        let services: BTreeSet<&String> = self.graph.services.iter().collect();
        if assigned != services {
            return false;
        }

        self.nodes.iter().all(|(node, members)| {
            members
                .iter()
                .all(|s| self.node_assignment.get(s) == Some(node))
        }) && self.nodes.values().map(BTreeSet::len).sum::<usize>() == self.node_assignment.len()
    }
}
