//! Terminal rendering of a generation run.

use super::report::TopologyReport;
use colored::*;
use std::path::PathBuf;

/// Render a human-readable summary of a topology report for the terminal
pub fn render_summary(report: &TopologyReport, written: &[PathBuf]) -> String {
    let mut out = String::new();

    out.push_str(&render_header(report));
    out.push_str(&render_services(report));
    out.push_str(&render_nodes(report));
    out.push_str(&render_files(written));

    out
}

fn render_header(report: &TopologyReport) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&"Trace Topology Summary".bold().to_string());
    out.push_str("\n---------------------------------------------------\n");
    out.push_str(&format!("Traces:       {}\n", report.trace_count));
    out.push_str(&format!("Services:     {}\n", report.service_count()));
    out.push_str(&format!("Operations:   {}\n", report.graph.operation_count()));
    out.push_str(&format!("Dependencies: {}\n", report.graph.edge_count()));
    out.push_str("---------------------------------------------------\n");
    out
}

fn render_services(report: &TopologyReport) -> String {
    let mut out = String::new();
    if report.graph.calls.is_empty() {
        return out;
    }

    out.push_str("\nService Calls:\n");
    for (caller, callees) in &report.graph.calls {
        for (callee, operations) in callees {
            out.push_str(&format!(
                "  {} -> {} ({} ops)\n",
                caller.cyan(),
                callee.cyan(),
                operations.len()
            ));
        }
    }
    out
}

fn render_nodes(report: &TopologyReport) -> String {
    let mut out = String::new();
    if report.nodes.is_empty() {
        return out;
    }

    out.push_str("\nDeployment Nodes:\n");
    for (node, services) in &report.nodes {
        let label = match report.node_namespaces.get(node) {
            Some(ns) => format!("{} [{}]", node, ns),
            None => node.clone(),
        };
        let services: Vec<&str> = services.iter().map(String::as_str).collect();
        out.push_str(&format!("  {}: {}\n", label.yellow(), services.join(", ")));
    }

    if !report.communication_paths.is_empty() {
        out.push_str(&format!(
            "  {} communication path(s)\n",
            report.communication_paths.len()
        ));
    }
    out
}

fn render_files(written: &[PathBuf]) -> String {
    let mut out = String::new();
    if written.is_empty() {
        return out;
    }

    out.push_str("\nFiles:\n");
    for path in written {
        out.push_str(&format!("  {} {}\n", "✓".green(), path.display()));
    }
    out
}
