//! Trace sources: local JSON exports and the Jaeger query API.

pub mod jaeger_api;
pub mod json_file;
pub mod parser;
pub mod types;

pub use jaeger_api::JaegerApiClient;
pub use json_file::{read_trace_file, JsonFileReader};
pub use parser::{detect_payload_format, parse_traces, parse_traces_str, PayloadFormat};

use crate::model::Trace;
use crate::utils::error::InputError;

/// Anything that can produce a list of traces
pub trait TraceReader {
    fn read_traces(&self) -> Result<Vec<Trace>, InputError>;
}
