//! Loosely typed key/value tags attached to spans and processes.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tag value as found in the trace JSON
///
/// Keeps the original JSON type; inference code renders it with `Display`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl TagValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TagValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TagValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Empty strings, `false` and zero count as absent
    pub fn is_truthy(&self) -> bool {
        match self {
            TagValue::Bool(b) => *b,
            TagValue::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            TagValue::String(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Bool(b) => write!(f, "{}", b),
            TagValue::Number(n) => write!(f, "{}", n),
            TagValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::String(value.to_string())
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        TagValue::String(value)
    }
}

impl From<bool> for TagValue {
    fn from(value: bool) -> Self {
        TagValue::Bool(value)
    }
}

impl From<i64> for TagValue {
    fn from(value: i64) -> Self {
        TagValue::Number(value.into())
    }
}

/// A single `{key, type, value}` tag entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,

    /// Jaeger's declared type ("string", "int64", "bool", ...), informational only
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub tag_type: Option<String>,

    /// `null` values are kept as `None` and ignored by metadata merging
    #[serde(default)]
    pub value: Option<TagValue>,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<TagValue>) -> Self {
        Self {
            key: key.into(),
            tag_type: None,
            value: Some(value.into()),
        }
    }
}

/// Flattened service metadata: tag key -> value
pub type Metadata = BTreeMap<String, TagValue>;

/// Find the first tag with the given key
pub fn find_tag<'a>(tags: &'a [Tag], key: &str) -> Option<&'a TagValue> {
    tags.iter()
        .find(|t| t.key == key)
        .and_then(|t| t.value.as_ref())
}

/// Treat an explicit JSON `null` like a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tag_value_preserves_type() {
        let tags: Vec<Tag> = serde_json::from_value(json!([
            {"key": "a", "type": "string", "value": "x"},
            {"key": "b", "type": "int64", "value": 42},
            {"key": "c", "type": "bool", "value": true},
            {"key": "d", "type": "float64", "value": 1.5},
        ]))
        .unwrap();

        assert_eq!(tags[0].value, Some(TagValue::String("x".into())));
        assert_eq!(tags[1].value.as_ref().unwrap().to_string(), "42");
        assert_eq!(tags[2].value.as_ref().unwrap().as_bool(), Some(true));
        assert_eq!(tags[3].value.as_ref().unwrap().as_f64(), Some(1.5));
    }

    #[test]
    fn test_truthiness() {
        assert!(TagValue::from("x").is_truthy());
        assert!(!TagValue::from("").is_truthy());
        assert!(!TagValue::from(false).is_truthy());
        assert!(!TagValue::from(0).is_truthy());
        assert!(TagValue::from(7).is_truthy());
    }

    #[test]
    fn test_null_value_is_none() {
        let tag: Tag = serde_json::from_value(json!({"key": "a", "value": null})).unwrap();
        assert!(tag.value.is_none());
    }

    #[test]
    fn test_object_value_is_rejected() {
        let result: Result<Tag, _> =
            serde_json::from_value(json!({"key": "a", "value": {"nested": 1}}));
        assert!(result.is_err());
    }

    #[test]
    fn test_find_tag() {
        let tags = vec![Tag::new("hostname", "node-1"), Tag::new("hostname", "node-2")];
        assert_eq!(find_tag(&tags, "hostname").unwrap().to_string(), "node-1");
        assert!(find_tag(&tags, "missing").is_none());
    }
}
