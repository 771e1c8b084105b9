//! Spans, span references and processes in the Jaeger JSON layout.

use super::tag::{find_tag, null_as_default, Tag, TagValue};
use serde::{Deserialize, Serialize};

/// Relationship between two spans
///
/// Parsed case-insensitively; unknown kinds are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RefType {
    ChildOf,
    FollowsFrom,
    Other(String),
}

impl From<String> for RefType {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("CHILD_OF") {
            RefType::ChildOf
        } else if value.eq_ignore_ascii_case("FOLLOWS_FROM") {
            RefType::FollowsFrom
        } else {
            RefType::Other(value)
        }
    }
}

impl From<RefType> for String {
    fn from(value: RefType) -> Self {
        match value {
            RefType::ChildOf => "CHILD_OF".to_string(),
            RefType::FollowsFrom => "FOLLOWS_FROM".to_string(),
            RefType::Other(s) => s,
        }
    }
}

/// Link from one span to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "refType")]
    pub ref_type: RefType,

    #[serde(rename = "traceID", default)]
    pub trace_id: String,

    #[serde(rename = "spanID")]
    pub span_id: String,
}

impl Reference {
    pub fn child_of(span_id: impl Into<String>) -> Self {
        Self {
            ref_type: RefType::ChildOf,
            trace_id: String::new(),
            span_id: span_id.into(),
        }
    }

    pub fn is_child_of(&self) -> bool {
        self.ref_type == RefType::ChildOf
    }

    pub fn is_follows_from(&self) -> bool {
        self.ref_type == RefType::FollowsFrom
    }
}

/// One timed operation within a trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    #[serde(rename = "traceID", default)]
    pub trace_id: String,

    #[serde(rename = "spanID")]
    pub span_id: String,

    /// Raw operation name, never normalized here
    #[serde(rename = "operationName", default)]
    pub operation_name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub references: Vec<Reference>,

    /// Start instant in microseconds
    #[serde(rename = "startTime", default)]
    pub start_time: u64,

    /// Duration in microseconds
    #[serde(default)]
    pub duration: u64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub logs: Vec<serde_json::Value>,

    #[serde(rename = "processID", default)]
    pub process_id: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub warnings: Vec<String>,
}

impl Span {
    pub fn new(span_id: impl Into<String>, operation_name: impl Into<String>) -> Self {
        Self {
            trace_id: String::new(),
            span_id: span_id.into(),
            operation_name: operation_name.into(),
            references: Vec::new(),
            start_time: 0,
            duration: 0,
            tags: Vec::new(),
            logs: Vec::new(),
            process_id: None,
            warnings: Vec::new(),
        }
    }

    pub fn with_process(mut self, process_id: impl Into<String>) -> Self {
        self.process_id = Some(process_id.into());
        self
    }

    pub fn with_parent(mut self, parent_span_id: impl Into<String>) -> Self {
        self.references.push(Reference::child_of(parent_span_id));
        self
    }

    pub fn with_timing(mut self, start_time: u64, duration: u64) -> Self {
        self.start_time = start_time;
        self.duration = duration;
        self
    }

    /// Span id of the first `CHILD_OF` reference
    pub fn parent_span_id(&self) -> Option<&str> {
        self.references
            .iter()
            .find(|r| r.is_child_of())
            .map(|r| r.span_id.as_str())
    }

    pub fn is_root_span(&self) -> bool {
        self.parent_span_id().is_none()
    }

    pub fn tag(&self, key: &str) -> Option<&TagValue> {
        find_tag(&self.tags, key)
    }
}

/// A traced process: the service name plus runtime/host metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Process {
    #[serde(rename = "serviceName", default)]
    pub service_name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,
}

impl Process {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<TagValue>) -> Self {
        self.tags.push(Tag::new(key, value));
        self
    }

    pub fn tag(&self, key: &str) -> Option<&TagValue> {
        find_tag(&self.tags, key)
    }
}
