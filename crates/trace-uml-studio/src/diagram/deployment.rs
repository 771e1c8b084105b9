//! Deployment diagram from inferred topology.

use super::{diagram_name, quote, write_footer, write_header, Diagram, DiagramGenerator, DiagramType};
use crate::aggregator::TraceAggregator;
use crate::model::Trace;
use crate::normalize::{clean_service_name, sanitize_identifier};
use crate::topology::DeploymentTopology;
use crate::utils::config::DiagramConfig;
use crate::utils::error::DiagramError;
use log::{info, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

/// PlantUML id per node; names that sanitize to the same id get `_2`, `_3`, ...
fn node_ids(topology: &DeploymentTopology) -> BTreeMap<&str, String> {
    let mut taken = BTreeSet::new();
    let mut ids = BTreeMap::new();
    for node in topology.nodes.keys() {
        let base = format!("node_{}", sanitize_identifier(node));
        let mut id = base.clone();
        let mut n = 1;
        while !taken.insert(id.clone()) {
            n += 1;
            id = format!("{}_{}", base, n);
        }
        ids.insert(node.as_str(), id);
    }
    ids
}

#[derive(Debug, Clone, Default)]
pub struct DeploymentDiagramGenerator {
    config: DiagramConfig,
}

impl DeploymentDiagramGenerator {
    pub fn new(config: DiagramConfig) -> Self {
        Self { config }
    }

    /// Render an inferred topology
    ///
    /// Nodes with a namespace are wrapped in a `package` of that name.
    pub fn render(
        &self,
        topology: &DeploymentTopology,
        name: &str,
    ) -> Result<Diagram, DiagramError> {
        let mut out = String::new();
        write_header(&mut out, name, &self.config)?;

        let ids = node_ids(topology);
        for (node, services) in &topology.nodes {
            let node_id = &ids[node.as_str()];
            let namespace = topology.namespace_for(node);
            let indent = if namespace.is_some() { "  " } else { "" };

            if let Some(ns) = namespace {
                writeln!(out, "package {} {{", quote(ns))?;
            }
            writeln!(out, "{}node {} as {} {{", indent, quote(node), node_id)?;
            for service in services {
                writeln!(
                    out,
                    "{}  artifact {} as {}",
                    indent,
                    quote(&clean_service_name(service)),
                    sanitize_identifier(service)
                )?;
            }
            writeln!(out, "{}}}", indent)?;
            if namespace.is_some() {
                writeln!(out, "}}")?;
            }
        }

        if !topology.paths.is_empty() {
            writeln!(out)?;
        }
        for pair in &topology.paths {
            if let (Some(first), Some(second)) =
                (ids.get(pair.first.as_str()), ids.get(pair.second.as_str()))
            {
                writeln!(out, "{} -- {}", first, second)?;
            }
        }

        write_footer(&mut out)?;

        info!(
            "Generated deployment diagram with {} node(s) and {} service(s)",
            topology.nodes.len(),
            topology.assignment.len()
        );

        Ok(Diagram {
            name: name.to_string(),
            diagram_type: DiagramType::Deployment,
            source: out,
        })
    }
}

impl DiagramGenerator for DeploymentDiagramGenerator {
    fn diagram_type(&self) -> DiagramType {
        DiagramType::Deployment
    }

    fn generate(&self, traces: &[Trace]) -> Result<Vec<Diagram>, DiagramError> {
        if traces.is_empty() {
            warn!("No traces provided for deployment diagram generation");
            return Ok(Vec::new());
        }

        let aggregator = TraceAggregator::new(traces);
        let topology = DeploymentTopology::from_aggregator(&aggregator);
        let name = diagram_name(traces[0].source_name.as_deref(), DiagramType::Deployment);
        Ok(vec![self.render(&topology, &name)?])
    }
}
