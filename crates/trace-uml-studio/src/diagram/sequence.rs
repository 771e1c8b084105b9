//! Per-trace sequence diagrams.

use super::{diagram_name, quote, write_footer, write_header, Diagram, DiagramGenerator, DiagramType};
use crate::model::Trace;
use crate::normalize::{clean_operation_name, clean_service_name, sanitize_identifier};
use crate::utils::config::DiagramConfig;
use crate::utils::error::DiagramError;
use log::{info, warn};
use std::fmt::Write;

/// One cross-service call shown as a sequence message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub from: String,
    pub to: String,
    pub label: String,
    pub duration: u64,
}

/// Cross-service parent -> child calls of a trace, in start-time order
pub fn collect_messages(trace: &Trace) -> Vec<Message> {
    trace
        .spans_sorted_by_time()
        .into_iter()
        .filter_map(|span| {
            let callee = trace.service_name(span);
            let caller = trace.parent_service_name(span)?;
            (caller != callee).then(|| Message {
                from: caller.to_string(),
                to: callee.to_string(),
                label: clean_operation_name(&span.operation_name),
                duration: span.duration,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct SequenceDiagramGenerator {
    config: DiagramConfig,
}

impl SequenceDiagramGenerator {
    pub fn new(config: DiagramConfig) -> Self {
        Self { config }
    }

    /// Render a single trace
    pub fn generate_for_trace(&self, trace: &Trace, name: &str) -> Result<Diagram, DiagramError> {
        let mut out = String::new();
        write_header(&mut out, name, &self.config)?;

        let services = trace.all_service_names();
        for service in &services {
            writeln!(
                out,
                "participant {} as {}",
                quote(&clean_service_name(service)),
                sanitize_identifier(service)
            )?;
        }
        writeln!(out)?;

        let messages = collect_messages(trace);
        for message in &messages {
            write!(
                out,
                "{} -> {} : {}",
                sanitize_identifier(&message.from),
                sanitize_identifier(&message.to),
                message.label
            )?;
            if self.config.show_durations && message.duration > 0 {
                write!(out, " ({}µs)", message.duration)?;
            }
            writeln!(out)?;
        }

        let total = trace.duration();
        if self.config.show_durations && total > 0 {
            writeln!(out)?;
            writeln!(out, "caption Total duration: {}µs", total)?;
        }

        write_footer(&mut out)?;

        info!(
            "Generated sequence diagram for trace {} with {} participants and {} messages ({}µs)",
            trace.trace_id,
            services.len(),
            messages.len(),
            total
        );

        Ok(Diagram {
            name: name.to_string(),
            diagram_type: DiagramType::Sequence,
            source: out,
        })
    }
}

impl DiagramGenerator for SequenceDiagramGenerator {
    fn diagram_type(&self) -> DiagramType {
        DiagramType::Sequence
    }

    fn generate(&self, traces: &[Trace]) -> Result<Vec<Diagram>, DiagramError> {
        if traces.is_empty() {
            warn!("No traces provided for sequence diagram generation");
            return Ok(Vec::new());
        }

        let numbered = traces.len() > 1;
        traces
            .iter()
            .enumerate()
            .map(|(index, trace)| {
                let mut name = diagram_name(trace.source_name.as_deref(), DiagramType::Sequence);
                if numbered {
                    name = format!("{}_{}", name, index + 1);
                }
                self.generate_for_trace(trace, &name)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Process, Span};
    use pretty_assertions::assert_eq;

    fn trace() -> Trace {
        Trace::new("t1")
            .with_process("p1", Process::new("frontend"))
            .with_process("p2", Process::new("product-catalog"))
            .with_span(Span::new("a", "GET /").with_process("p1").with_timing(0, 100))
            .with_span(
                Span::new("b", "grpc.hipstershop.ProductCatalogService/GetProduct")
                    .with_process("p2")
                    .with_parent("a")
                    .with_timing(10, 42),
            )
            .with_span(
                Span::new("c", "render")
                    .with_process("p1")
                    .with_parent("a")
                    .with_timing(5, 0),
            )
    }

    #[test]
    fn test_collect_messages_skips_same_service() {
        let messages = collect_messages(&trace());
        assert_eq!(
            messages,
            vec![Message {
                from: "frontend".into(),
                to: "product-catalog".into(),
                label: "ProductCatalogService/GetProduct".into(),
                duration: 42,
            }]
        );
    }

    #[test]
    fn test_generate_single_trace() {
        let diagrams = SequenceDiagramGenerator::default()
            .generate(&[trace().with_source_name("shop")])
            .unwrap();
        assert_eq!(diagrams.len(), 1);

        let d = &diagrams[0];
        assert_eq!(d.name, "shop_Sequence");
        assert!(d.source.contains("participant \"product-catalog\" as product_catalog"));
        assert!(d
            .source
            .contains("frontend -> product_catalog : ProductCatalogService/GetProduct (42µs)"));
        assert!(d.source.trim_end().ends_with("@enduml"));
        assert!(d.source.contains("caption Total duration: 100µs"));
    }

    #[test]
    fn test_participants_come_from_spans() {
        let trace = Trace::new("t2")
            .with_process("p1", Process::new("frontend"))
            .with_process("p2", Process::new("idle-sidecar"))
            .with_span(Span::new("a", "GET /pay").with_process("p1"))
            .with_span(Span::new("b", "Charge").with_process("ghost").with_parent("a"));

        let d = SequenceDiagramGenerator::default()
            .generate_for_trace(&trace, "pay")
            .unwrap();

        assert!(d.source.contains("participant \"unknown\" as unknown"));
        assert!(!d.source.contains("idle-sidecar"));
        assert!(d.source.contains("frontend -> unknown : Charge"));
    }

    #[test]
    fn test_participant_labels_are_cleaned() {
        let trace = Trace::new("t3")
            .with_process("p1", Process::new("grpc.payments"))
            .with_span(Span::new("a", "Charge").with_process("p1"));

        let d = SequenceDiagramGenerator::default()
            .generate_for_trace(&trace, "x")
            .unwrap();
        assert!(d.source.contains("participant \"payments\" as grpc_payments"));
    }

    #[test]
    fn test_generate_numbers_multiple_traces() {
        let diagrams = SequenceDiagramGenerator::default()
            .generate(&[trace(), trace()])
            .unwrap();
        let names: Vec<&str> = diagrams.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["SequenceDiagram_1", "SequenceDiagram_2"]);
    }

    #[test]
    fn test_durations_can_be_hidden() {
        let config = DiagramConfig {
            show_durations: false,
            ..DiagramConfig::default()
        };
        let d = SequenceDiagramGenerator::new(config)
            .generate_for_trace(&trace(), "x")
            .unwrap();
        assert!(!d.source.contains("µs"));
        assert!(!d.source.contains("caption"));
    }
}
