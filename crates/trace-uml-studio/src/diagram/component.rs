//! Aggregate component diagram: services, their interfaces and who calls whom.

use super::{diagram_name, quote, write_footer, write_header, Diagram, DiagramGenerator, DiagramType};
use crate::aggregator::{ServiceGraph, TraceAggregator};
use crate::model::{Metadata, Trace};
use crate::normalize::{clean_operation_name, clean_service_name, sanitize_identifier};
use crate::utils::config::DiagramConfig;
use crate::utils::error::DiagramError;
use log::{info, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Write};

/// Role of a service, guessed from its name and metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stereotype {
    WebUi,
    Gateway,
    Database,
    Cache,
    Grpc,
    Microservice,
}

impl Stereotype {
    /// Classify a service; `None` when nothing matches
    pub fn detect(service: &str, metadata: Option<&Metadata>) -> Option<Self> {
        let name = service.to_lowercase();
        let has_any = |keywords: &[&str]| keywords.iter().any(|k| name.contains(k));

        if has_any(&["frontend", "ui", "web", "client"]) {
            return Some(Self::WebUi);
        }
        if has_any(&["gateway", "ingress"]) {
            return Some(Self::Gateway);
        }
        if has_any(&["database", "db", "mongo", "postgres", "mysql"]) {
            return Some(Self::Database);
        }
        if has_any(&["cache", "redis", "memcache"]) {
            return Some(Self::Cache);
        }

        let grpc = metadata
            .and_then(|m| m.get("rpc.system"))
            .is_some_and(|v| v.to_string().to_lowercase().contains("grpc"));
        if grpc {
            return Some(Self::Grpc);
        }

        name.ends_with("service").then_some(Self::Microservice)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::WebUi => "WebUI",
            Self::Gateway => "Gateway",
            Self::Database => "Database",
            Self::Cache => "Cache",
            Self::Grpc => "gRPC",
            Self::Microservice => "Microservice",
        }
    }
}

impl fmt::Display for Stereotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cleaned operations each callee exposes, merged across all callers
fn interface_operations(graph: &ServiceGraph) -> BTreeMap<&str, BTreeSet<String>> {
    let mut interfaces: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();
    for callees in graph.calls.values() {
        for (callee, operations) in callees {
            interfaces
                .entry(callee.as_str())
                .or_default()
                .extend(operations.iter().map(|op| clean_operation_name(op)));
        }
    }
    interfaces
}

#[derive(Debug, Clone, Default)]
pub struct ComponentDiagramGenerator {
    config: DiagramConfig,
}

impl ComponentDiagramGenerator {
    pub fn new(config: DiagramConfig) -> Self {
        Self { config }
    }

    /// Render an already aggregated service graph
    pub fn render(&self, graph: &ServiceGraph, name: &str) -> Result<Diagram, DiagramError> {
        let mut out = String::new();
        write_header(&mut out, name, &self.config)?;

        for service in &graph.services {
            write!(
                out,
                "component {} as {}",
                quote(&clean_service_name(service)),
                sanitize_identifier(service)
            )?;
            if self.config.show_stereotypes {
                if let Some(stereotype) = Stereotype::detect(service, graph.metadata.get(service))
                {
                    write!(out, " <<{}>>", stereotype)?;
                }
            }
            writeln!(out)?;
        }

        let interfaces = interface_operations(graph);
        let max = self.config.max_interface_operations;
        for (callee, operations) in &interfaces {
            let interface_id = format!("{}API", sanitize_identifier(callee));
            writeln!(out)?;
            writeln!(
                out,
                "interface {} as {}",
                quote(&format!("{}API", clean_service_name(callee))),
                interface_id
            )?;
            writeln!(out, "{} -() {}", sanitize_identifier(callee), interface_id)?;

            if !operations.is_empty() {
                writeln!(out, "note right of {}", interface_id)?;
                for op in operations.iter().take(max) {
                    writeln!(out, "  {}", op)?;
                }
                if operations.len() > max {
                    writeln!(
                        out,
                        "  +{} more operations not shown",
                        operations.len() - max
                    )?;
                }
                writeln!(out, "end note")?;
            }
        }

        let mut edges = 0;
        if !graph.calls.is_empty() {
            writeln!(out)?;
        }
        for (caller, callees) in &graph.calls {
            for callee in callees.keys() {
                writeln!(
                    out,
                    "{} ..> {}API : uses",
                    sanitize_identifier(caller),
                    sanitize_identifier(callee)
                )?;
                edges += 1;
            }
        }

        write_footer(&mut out)?;

        info!(
            "Generated component diagram with {} service(s) and {} dependencies",
            graph.services.len(),
            edges
        );

        Ok(Diagram {
            name: name.to_string(),
            diagram_type: DiagramType::Component,
            source: out,
        })
    }
}

impl DiagramGenerator for ComponentDiagramGenerator {
    fn diagram_type(&self) -> DiagramType {
        DiagramType::Component
    }

    fn generate(&self, traces: &[Trace]) -> Result<Vec<Diagram>, DiagramError> {
        if traces.is_empty() {
            warn!("No traces provided for component diagram generation");
            return Ok(Vec::new());
        }

        let aggregator = TraceAggregator::new(traces);
        let name = diagram_name(traces[0].source_name.as_deref(), DiagramType::Component);
        Ok(vec![self.render(aggregator.graph(), &name)?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TagValue;

    #[test]
    fn test_stereotype_by_name() {
        assert_eq!(Stereotype::detect("frontend", None), Some(Stereotype::WebUi));
        assert_eq!(Stereotype::detect("api-gateway", None), Some(Stereotype::Gateway));
        assert_eq!(Stereotype::detect("orders-db", None), Some(Stereotype::Database));
        assert_eq!(Stereotype::detect("redis", None), Some(Stereotype::Cache));
        assert_eq!(Stereotype::detect("CartService", None), Some(Stereotype::Microservice));
        assert_eq!(Stereotype::detect("checkout", None), None);
    }

    #[test]
    fn test_stereotype_from_rpc_system() {
        let meta: Metadata = [("rpc.system".to_string(), TagValue::from("gRPC"))].into();
        assert_eq!(Stereotype::detect("checkout", Some(&meta)), Some(Stereotype::Grpc));
    }

    #[test]
    fn test_interface_truncation() {
        let mut graph = ServiceGraph::new();
        graph.record_operation("a", "x");
        graph.record_operation("b", "y");
        for i in 0..4 {
            graph.record_call("a", "b", &format!("op{}", i));
        }

        let generator =
            ComponentDiagramGenerator::new(DiagramConfig::new().with_max_interface_operations(2));
        let d = generator.render(&graph, "c").unwrap();

        assert!(d.source.contains("interface \"bAPI\" as bAPI"));
        assert!(d.source.contains("  op0\n  op1\n  +2 more operations not shown"));
        assert!(!d.source.contains("  op2"));
        assert!(d.source.contains("a ..> bAPI : uses"));
        assert!(d.source.contains("b -() bAPI"));
    }

    #[test]
    fn test_interface_label_is_quoted() {
        let mut graph = ServiceGraph::new();
        graph.record_operation("web", "GET /");
        graph.record_operation("odd\"svc", "op");
        graph.record_call("web", "odd\"svc", "op");

        let d = ComponentDiagramGenerator::default().render(&graph, "c").unwrap();

        assert!(d.source.contains("interface \"odd'svcAPI\" as odd_svcAPI"));
        assert!(d.source.contains("component \"odd'svc\" as odd_svc"));
    }

    #[test]
    fn test_generate_empty() {
        assert!(ComponentDiagramGenerator::default().generate(&[]).unwrap().is_empty());
    }
}
