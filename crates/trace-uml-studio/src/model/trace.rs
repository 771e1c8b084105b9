//! A complete trace: spans plus the processes they ran in.

use super::span::{Process, Span};
use crate::utils::config::UNKNOWN_SERVICE;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One distributed trace in Jaeger JSON layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(rename = "traceID", default)]
    pub trace_id: String,

    #[serde(default, deserialize_with = "super::tag::null_as_default")]
    pub spans: Vec<Span>,

    /// Process id -> process
    #[serde(default, deserialize_with = "super::tag::null_as_default")]
    pub processes: BTreeMap<String, Process>,

    #[serde(default, deserialize_with = "super::tag::null_as_default")]
    pub warnings: Vec<String>,

    /// Where the trace was loaded from (file stem, or API service query).
    /// Not part of the wire format.
    #[serde(skip)]
    pub source_name: Option<String>,
}

impl Trace {
    pub fn new(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            ..Default::default()
        }
    }

    pub fn with_process(mut self, process_id: impl Into<String>, process: Process) -> Self {
        self.processes.insert(process_id.into(), process);
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.spans.push(span);
        self
    }

    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    pub fn process(&self, process_id: &str) -> Option<&Process> {
        self.processes.get(process_id)
    }

    /// Process a span ran in, if its `processID` resolves
    pub fn span_process(&self, span: &Span) -> Option<&Process> {
        span.process_id.as_deref().and_then(|id| self.process(id))
    }

    /// Raw service name of a span, `"unknown"` when the process is missing
    pub fn service_name(&self, span: &Span) -> &str {
        self.span_process(span)
            .map(|p| p.service_name.as_str())
            .unwrap_or(UNKNOWN_SERVICE)
    }

    pub fn span(&self, span_id: &str) -> Option<&Span> {
        self.spans.iter().find(|s| s.span_id == span_id)
    }

    pub fn root_spans(&self) -> Vec<&Span> {
        self.spans.iter().filter(|s| s.is_root_span()).collect()
    }

    /// Spans whose first `CHILD_OF` reference points at `parent_span_id`
    pub fn child_spans(&self, parent_span_id: &str) -> Vec<&Span> {
        self.spans
            .iter()
            .filter(|s| s.parent_span_id() == Some(parent_span_id))
            .collect()
    }

    /// Spans ordered by start time; equal start times keep input order
    pub fn spans_sorted_by_time(&self) -> Vec<&Span> {
        let mut spans: Vec<&Span> = self.spans.iter().collect();
        spans.sort_by_key(|s| s.start_time);
        spans
    }

    /// Distinct service names of the spans, sorted
    ///
    /// Spans with an unresolvable process count as `"unknown"`; processes
    /// no span runs in are left out.
    pub fn all_service_names(&self) -> Vec<String> {
        self.spans
            .iter()
            .map(|s| self.service_name(s).to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Service owning the parent span, if the parent is in this trace
    pub fn parent_service_name(&self, span: &Span) -> Option<&str> {
        span.parent_span_id()
            .and_then(|id| self.span(id))
            .map(|parent| self.service_name(parent))
    }

    /// Total wall-clock duration covered by the trace's spans
    pub fn duration(&self) -> u64 {
        let start = self.spans.iter().map(|s| s.start_time).min();
        let end = self
            .spans
            .iter()
            .map(|s| s.start_time.saturating_add(s.duration))
            .max();
        match (start, end) {
            (Some(start), Some(end)) => end.saturating_sub(start),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Trace {
        Trace::new("t1")
            .with_process("p1", Process::new("frontend"))
            .with_process("p2", Process::new("cart"))
            .with_process("p3", Process::new("frontend"))
            .with_process("p4", Process::new("idle-sidecar"))
            .with_span(Span::new("a", "GET /").with_process("p1").with_timing(100, 50))
            .with_span(
                Span::new("b", "GetCart")
                    .with_process("p2")
                    .with_parent("a")
                    .with_timing(110, 20),
            )
            .with_span(
                Span::new("c", "Render")
                    .with_process("p3")
                    .with_parent("a")
                    .with_timing(110, 30),
            )
            .with_span(Span::new("d", "orphan").with_process("missing").with_timing(90, 5))
    }

    #[test]
    fn test_service_name_resolution() {
        let trace = sample();
        assert_eq!(trace.service_name(&trace.spans[1]), "cart");
        assert_eq!(trace.service_name(&trace.spans[3]), "unknown");
    }

    #[test]
    fn test_root_and_child_spans() {
        let trace = sample();
        let roots: Vec<&str> = trace.root_spans().iter().map(|s| s.span_id.as_str()).collect();
        assert_eq!(roots, vec!["a", "d"]);

        let children: Vec<&str> = trace
            .child_spans("a")
            .iter()
            .map(|s| s.span_id.as_str())
            .collect();
        assert_eq!(children, vec!["b", "c"]);
        assert!(trace.child_spans("zzz").is_empty());
    }

    #[test]
    fn test_spans_sorted_by_time_is_stable() {
        let trace = sample();
        let order: Vec<&str> = trace
            .spans_sorted_by_time()
            .iter()
            .map(|s| s.span_id.as_str())
            .collect();
        assert_eq!(order, vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn test_all_service_names_distinct_sorted() {
        assert_eq!(
            sample().all_service_names(),
            vec!["cart", "frontend", "unknown"]
        );
    }

    #[test]
    fn test_parent_service_name() {
        let trace = sample();
        assert_eq!(trace.parent_service_name(&trace.spans[1]), Some("frontend"));
        assert_eq!(trace.parent_service_name(&trace.spans[0]), None);
    }

    #[test]
    fn test_duration() {
        assert_eq!(sample().duration(), 60);
        assert_eq!(Trace::new("empty").duration(), 0);
    }

    #[test]
    fn test_source_name_not_serialized() {
        let trace = Trace::new("t").with_source_name("file");
        let json = serde_json::to_value(&trace).unwrap();
        assert!(json.get("source_name").is_none());
        assert!(json.get("sourceName").is_none());
    }
}
