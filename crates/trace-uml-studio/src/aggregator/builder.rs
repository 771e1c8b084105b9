//! Single-pass aggregation of traces into a [`ServiceGraph`].

use super::graph::{CallMatrix, ServiceGraph};
use crate::model::{Metadata, Trace};
use log::{debug, info};
use std::collections::{BTreeMap, BTreeSet};

/// Aggregates a set of traces into a global service view
///
/// **Public** - main entry point for aggregation
///
/// Borrows the traces read-only and does all the work in [`TraceAggregator::new`];
/// every accessor afterwards is a pure read.
///
/// Metadata is merged last-write-wins in the order the traces are given,
/// then in span order. Callers that need reproducible metadata must pass
/// the traces in a fixed order.
#[derive(Debug, Clone)]
pub struct TraceAggregator<'a> {
    traces: &'a [Trace],
    graph: ServiceGraph,
}

impl<'a> TraceAggregator<'a> {
    /// Aggregate `traces` (possibly empty)
    ///
    /// # Example
    /// ```ignore
    /// let traces = JsonFileReader::new("trace.json").read_traces()?;
    /// let aggregator = TraceAggregator::new(&traces);
    /// println!("{} services", aggregator.all_services().len());
    /// ```
    pub fn new(traces: &'a [Trace]) -> Self {
        let graph = aggregate(traces);
        info!(
            "Aggregated {} traces into {} services",
            traces.len(),
            graph.services.len()
        );
        Self { traces, graph }
    }

    pub fn traces(&self) -> &'a [Trace] {
        self.traces
    }

    pub fn graph(&self) -> &ServiceGraph {
        &self.graph
    }

    pub fn into_graph(self) -> ServiceGraph {
        self.graph
    }

    pub fn all_services(&self) -> &BTreeSet<String> {
        &self.graph.services
    }

    pub fn service_operations(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.graph.operations
    }

    pub fn service_dependencies(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.graph.dependencies
    }

    pub fn service_metadata(&self) -> &BTreeMap<String, Metadata> {
        &self.graph.metadata
    }

    pub fn service_calls(&self) -> &CallMatrix {
        &self.graph.calls
    }

    pub fn operations_for(&self, service: &str) -> Option<&BTreeSet<String>> {
        self.graph.operations.get(service)
    }

    pub fn dependencies_for(&self, service: &str) -> Option<&BTreeSet<String>> {
        self.graph.dependencies.get(service)
    }

    pub fn metadata_for(&self, service: &str) -> Option<&Metadata> {
        self.graph.metadata.get(service)
    }

    /// Operations `caller` invoked on `callee`
    pub fn calls_between(&self, caller: &str, callee: &str) -> Option<&BTreeSet<String>> {
        self.graph.calls.get(caller).and_then(|m| m.get(callee))
    }
}

/// Build the service graph
///
/// # Algorithm
/// For every span, in trace order then span order:
/// 1. Resolve the owning service (`"unknown"` when the process is missing)
/// 2. Record the service and the span's raw operation name
/// 3. Merge the process tags into the service metadata
/// 4. Record a dependency when the `CHILD_OF` parent lives in another service
pub fn aggregate(traces: &[Trace]) -> ServiceGraph {
    let mut graph = ServiceGraph::new();

    for trace in traces {
        debug!(
            "Aggregating trace {} ({} spans)",
            trace.trace_id,
            trace.spans.len()
        );

        for span in &trace.spans {
            let service = trace.service_name(span);
            graph.record_operation(service, &span.operation_name);

            if let Some(process) = trace.span_process(span) {
                graph.merge_metadata(
                    service,
                    process
                        .tags
                        .iter()
                        .map(|t| (t.key.as_str(), t.value.as_ref())),
                );
            }

            let Some(parent_id) = span.parent_span_id() else {
                continue;
            };

            match trace.span(parent_id) {
                Some(parent) => {
                    let parent_service = trace.service_name(parent);
                    graph.record_call(parent_service, service, &span.operation_name);
                }
                None => debug!(
                    "Span {} references missing parent {} in trace {}",
                    span.span_id, parent_id, trace.trace_id
                ),
            }
        }
    }

    graph
}
