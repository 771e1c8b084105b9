use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::NamedTempFile;
use trace_uml_studio::aggregator::TraceAggregator;
use trace_uml_studio::diagram::{Diagram, DiagramType};
use trace_uml_studio::model::{Process, Span, Trace};
use trace_uml_studio::output::validate_path;
use trace_uml_studio::output::{read_report, render_summary, write_diagram, write_report, TopologyReport};

fn create_test_report() -> TopologyReport {
    let traces = vec![Trace::new("t1")
        .with_process(
            "p1",
            Process::new("frontend")
                .with_tag("hostname", "vm-1")
                .with_tag("namespace", "shop"),
        )
        .with_process("p2", Process::new("cart").with_tag("hostname", "vm-2"))
        .with_span(Span::new("a", "GET /cart").with_process("p1"))
        .with_span(Span::new("b", "GetCart").with_process("p2").with_parent("a"))];

    TopologyReport::from_aggregator(TraceAggregator::new(&traces))
}

fn create_test_diagram(name: &str) -> Diagram {
    Diagram {
        name: name.to_string(),
        diagram_type: DiagramType::Sequence,
        source: "@startuml x\n@enduml\n".to_string(),
    }
}

#[test]
fn test_write_and_read_report() {
    let report = create_test_report();
    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    write_report(&report, path).unwrap();
    let loaded = read_report(path).unwrap();

    assert_eq!(loaded, report);
    assert!(loaded.is_consistent());
    assert_eq!(loaded.service_count(), 2);
}

#[test]
fn test_validate_output_path_empty() {
    assert!(validate_path(Path::new("")).is_err());
}

#[test]
fn test_validate_output_path_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    assert!(validate_path(temp_dir.path()).is_err());
}

#[test]
fn test_write_report_creates_parent_dirs() {
    let temp_dir = tempfile::tempdir().unwrap();
    let nested = temp_dir.path().join("reports/nested/topology.json");

    write_report(&create_test_report(), &nested).unwrap();
    assert!(nested.exists());
}

#[test]
fn test_write_diagram_uses_sanitized_name() {
    let temp_dir = tempfile::tempdir().unwrap();
    let out_dir = temp_dir.path().join("diagrams");

    let path = write_diagram(&create_test_diagram("checkout-flow_Sequence"), &out_dir).unwrap();

    assert_eq!(path, out_dir.join("checkout_flow_Sequence.puml"));
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "@startuml x\n@enduml\n"
    );
}

#[test]
fn test_read_report_missing_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    assert!(read_report(temp_dir.path().join("missing.json")).is_err());
}

#[test]
fn test_render_summary() {
    colored::control::set_override(false);

    let report = create_test_report();
    let summary = render_summary(&report, &[Path::new("out/x.puml").to_path_buf()]);

    assert!(summary.contains("Trace Topology Summary"));
    assert!(summary.contains("Services:     2"));
    assert!(summary.contains("frontend -> cart (1 ops)"));
    assert!(summary.contains("vm-1 [shop]: frontend"));
    assert!(summary.contains("1 communication path(s)"));
    assert!(summary.contains("out/x.puml"));
}
