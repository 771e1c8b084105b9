//! Detect the shape of a trace payload and deserialize it.
//!
//! Accepted layouts:
//! - `{"data": [trace, ...]}` or `{"data": trace}` (Jaeger UI export / API)
//! - `[trace, ...]`
//! - a single trace object

use crate::model::Trace;
use crate::utils::error::ParseError;
use log::debug;
use serde_json::Value;

/// Payload layout, detected before deserializing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    Envelope,
    Array,
    Single,
}

/// Work out which layout a payload uses
pub fn detect_payload_format(value: &Value) -> Result<PayloadFormat, ParseError> {
    match value {
        Value::Array(_) => Ok(PayloadFormat::Array),
        Value::Object(map) if map.contains_key("data") => Ok(PayloadFormat::Envelope),
        Value::Object(map) if map.contains_key("traceID") || map.contains_key("spans") => {
            Ok(PayloadFormat::Single)
        }
        Value::Object(_) => Err(ParseError::InvalidFormat(
            "expected a trace object, an array of traces or a {\"data\": ...} envelope".to_string(),
        )),
        other => Err(ParseError::InvalidFormat(format!(
            "unexpected top-level JSON {}",
            json_kind(other)
        ))),
    }
}

/// Parse every trace contained in `value`
///
/// **Public** - shared by the file reader and the API client
///
/// # Errors
/// * `ParseError::InvalidFormat` - unrecognised layout
/// * `ParseError::JsonError` - a trace does not match the Jaeger schema
pub fn parse_traces(value: Value) -> Result<Vec<Trace>, ParseError> {
    let format = detect_payload_format(&value)?;
    debug!("Detected payload format: {:?}", format);

    match format {
        PayloadFormat::Array => parse_array(value),
        PayloadFormat::Single => Ok(vec![serde_json::from_value(value)?]),
        PayloadFormat::Envelope => {
            let data = match value {
                Value::Object(mut map) => map.remove("data").unwrap_or(Value::Null),
                _ => Value::Null,
            };
            match data {
                Value::Null => Ok(Vec::new()),
                Value::Array(_) => parse_array(data),
                Value::Object(_) => Ok(vec![serde_json::from_value(data)?]),
                other => Err(ParseError::InvalidFormat(format!(
                    "\"data\" must be a trace or an array of traces, found {}",
                    json_kind(&other)
                ))),
            }
        }
    }
}

/// Parse traces from raw JSON text
pub fn parse_traces_str(contents: &str) -> Result<Vec<Trace>, ParseError> {
    let value: Value = serde_json::from_str(contents)?;
    parse_traces(value)
}

fn parse_array(value: Value) -> Result<Vec<Trace>, ParseError> {
    Ok(serde_json::from_value(value)?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
