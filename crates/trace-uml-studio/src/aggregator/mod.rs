//! Aggregation of traces into a global service graph.
//!
//! This module turns a list of parsed traces into:
//! - The set of services and the operations each one handled
//! - Cross-service dependency edges
//! - Flattened per-service metadata
//! - An operation-level call matrix

pub mod builder;
pub mod graph;

// Re-export main types and functions
pub use builder::{aggregate, TraceAggregator};
pub use graph::{CallMatrix, ServiceGraph};
