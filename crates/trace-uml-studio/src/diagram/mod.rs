//! PlantUML diagram generation.
//!
//! Three generators consume traces (directly, or through the aggregator
//! and topology inference):
//! - [`SequenceDiagramGenerator`]: one diagram per trace
//! - [`ComponentDiagramGenerator`]: services, interfaces and call edges
//! - [`DeploymentDiagramGenerator`]: inferred nodes and communication paths

pub mod component;
pub mod deployment;
pub mod sequence;

pub use component::{ComponentDiagramGenerator, Stereotype};
pub use deployment::DeploymentDiagramGenerator;
pub use sequence::SequenceDiagramGenerator;

use crate::model::Trace;
use crate::utils::config::DiagramConfig;
use crate::utils::error::DiagramError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::str::FromStr;

/// Kind of UML diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramType {
    Sequence,
    Component,
    Deployment,
}

impl DiagramType {
    pub const ALL: [DiagramType; 3] = [
        DiagramType::Sequence,
        DiagramType::Component,
        DiagramType::Deployment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramType::Sequence => "sequence",
            DiagramType::Component => "component",
            DiagramType::Deployment => "deployment",
        }
    }

    /// Capitalised label used in diagram names
    pub fn label(&self) -> &'static str {
        match self {
            DiagramType::Sequence => "Sequence",
            DiagramType::Component => "Component",
            DiagramType::Deployment => "Deployment",
        }
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagramType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sequence" => Ok(DiagramType::Sequence),
            "component" => Ok(DiagramType::Component),
            "deployment" => Ok(DiagramType::Deployment),
            other => Err(format!(
                "unknown diagram type '{}' (expected sequence, component or deployment)",
                other
            )),
        }
    }
}

/// A generated diagram: PlantUML source plus a file-safe name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram {
    pub name: String,
    pub diagram_type: DiagramType,
    pub source: String,
}

/// Common interface of every diagram generator
pub trait DiagramGenerator {
    fn diagram_type(&self) -> DiagramType;

    /// Generate diagrams; empty input yields an empty list
    fn generate(&self, traces: &[Trace]) -> Result<Vec<Diagram>, DiagramError>;
}

/// Build the generators for the requested kinds, in the given order
pub fn generators_for(
    kinds: &[DiagramType],
    config: &DiagramConfig,
) -> Vec<Box<dyn DiagramGenerator>> {
    kinds
        .iter()
        .map(|kind| -> Box<dyn DiagramGenerator> {
            match kind {
                DiagramType::Sequence => Box::new(SequenceDiagramGenerator::new(config.clone())),
                DiagramType::Component => Box::new(ComponentDiagramGenerator::new(config.clone())),
                DiagramType::Deployment => {
                    Box::new(DeploymentDiagramGenerator::new(config.clone()))
                }
            }
        })
        .collect()
}

/// `<source_name>_<Kind>`, or `<Kind>Diagram` without a source name
pub fn diagram_name(source_name: Option<&str>, kind: DiagramType) -> String {
    match source_name.filter(|s| !s.is_empty()) {
        Some(source) => format!("{}_{}", source, kind.label()),
        None => format!("{}Diagram", kind.label()),
    }
}

/// Quote a label for use inside PlantUML double quotes
pub(crate) fn quote(label: &str) -> String {
    format!("\"{}\"", label.replace('"', "'"))
}

pub(crate) fn write_header(
    out: &mut String,
    name: &str,
    config: &DiagramConfig,
) -> Result<(), DiagramError> {
    writeln!(out, "@startuml {}", name)?;
    let title = config.title.as_deref().unwrap_or(name);
    writeln!(out, "title {}", title)?;
    writeln!(out)?;
    Ok(())
}

pub(crate) fn write_footer(out: &mut String) -> Result<(), DiagramError> {
    writeln!(out)?;
    writeln!(out, "@enduml")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagram_type_from_str() {
        assert_eq!("Sequence".parse::<DiagramType>(), Ok(DiagramType::Sequence));
        assert_eq!("deployment".parse::<DiagramType>(), Ok(DiagramType::Deployment));
        assert!("class".parse::<DiagramType>().is_err());
    }

    #[test]
    fn test_diagram_name() {
        assert_eq!(
            diagram_name(Some("checkout"), DiagramType::Component),
            "checkout_Component"
        );
        assert_eq!(diagram_name(None, DiagramType::Deployment), "DeploymentDiagram");
        assert_eq!(diagram_name(Some(""), DiagramType::Sequence), "SequenceDiagram");
    }

    #[test]
    fn test_generators_for_keeps_order() {
        let gens = generators_for(
            &[DiagramType::Deployment, DiagramType::Sequence],
            &DiagramConfig::default(),
        );
        let kinds: Vec<DiagramType> = gens.iter().map(|g| g.diagram_type()).collect();
        assert_eq!(kinds, vec![DiagramType::Deployment, DiagramType::Sequence]);
    }

    #[test]
    fn test_header_uses_title_override() {
        let mut out = String::new();
        let config = DiagramConfig::new().with_title("Shop");
        write_header(&mut out, "x_Sequence", &config).unwrap();
        assert!(out.starts_with("@startuml x_Sequence\ntitle Shop\n"));
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("a \"b\""), "\"a 'b'\"");
    }
}
