//! Trace data model.
//!
//! Mirrors the JSON that Jaeger exports and serves from `/api/traces`:
//! a trace holds spans and a map of processes, and every span points at
//! the process (service) that emitted it.

pub mod span;
pub mod tag;
pub mod trace;

pub use span::{Process, RefType, Reference, Span};
pub use tag::{find_tag, Metadata, Tag, TagValue};
pub use trace::Trace;
