use crate::output::read_report;
use crate::utils::config::REPORT_SCHEMA_VERSION;
use anyhow::Result;
use std::path::PathBuf;

/// Validate a topology report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)?;

    if report.version != REPORT_SCHEMA_VERSION {
        anyhow::bail!(
            "Unsupported report version {} (expected {})",
            report.version,
            REPORT_SCHEMA_VERSION
        );
    }
    if !report.is_consistent() {
        anyhow::bail!("Report node assignment does not match its service list");
    }

    println!("✓ Valid topology report");
    println!("  Version: {}", report.version);
    println!("  Generated: {}", report.generated_at);
    println!("  Traces: {}", report.trace_count);
    println!("  Services: {}", report.service_count());
    println!("  Nodes: {}", report.nodes.len());
    println!("  Communication Paths: {}", report.communication_paths.len());

    Ok(())
}

/// Display report schema information
pub fn display_schema(show_details: bool) {
    println!("Trace UML Studio Topology Report Schema");
    println!("Current Version: {}", REPORT_SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string              - Schema version (e.g., '1.0.0')");
        println!("  generated_at: string         - RFC 3339 timestamp");
        println!("  trace_count: number          - Traces aggregated");
        println!("  graph: object                - Aggregated service graph");
        println!("    services: array            - Service names");
        println!("    operations: object         - Service -> operation names");
        println!("    dependencies: object       - Service -> downstream services");
        println!("    metadata: object           - Service -> flattened process tags");
        println!("    calls: object              - Caller -> callee -> operations");
        println!("  node_assignment: object      - Service -> inferred node");
        println!("  nodes: object                - Node -> services");
        println!("  node_namespaces: object      - Node -> namespace label");
        println!("  communication_paths: array   - Unordered node pairs");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Trace UML Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", REPORT_SCHEMA_VERSION);
    println!();
    println!("Generates PlantUML sequence, component and deployment diagrams from Jaeger traces.");
}
