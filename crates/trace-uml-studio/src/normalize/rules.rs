//! Individual normalization rules.
//!
//! Each rule is a plain function so it can be tested on its own. The public
//! helpers in `normalize` chain them in a fixed order.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static LEADING_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[/\\]+").unwrap());

static PROTOCOL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(grpc\.|http\.|https\.|kafka\.|amqp\.|mqtt\.)").unwrap());

static QUALIFIED_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z][a-z0-9]*\.)+[A-Z][a-zA-Z0-9]*").unwrap());

static NAMESPACE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([a-z][a-z0-9]*\.)+").unwrap());

static LOWERCASE_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-z0-9]*$").unwrap());

static HASH_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-[a-f0-9]{8,}(-[a-z0-9]{5})?$").unwrap());

/// A single step of a normalization pipeline
pub type Transform = for<'a> fn(&'a str) -> Cow<'a, str>;

/// A candidate rewrite; `None` means the rule does not apply
pub type Rewrite = fn(&str) -> Option<String>;

/// Named rule in a first-match-wins chain
#[derive(Debug, Clone, Copy)]
pub struct NormalizeRule {
    pub name: &'static str,
    pub apply: Rewrite,
}

/// Steps applied, in order, to every operation name
pub const OPERATION_PIPELINE: &[Transform] = &[
    trim_whitespace,
    strip_leading_separators,
    strip_protocol_prefix,
    strip_namespace,
];

/// Steps applied, in order, to every service name
pub const SERVICE_PIPELINE: &[Transform] = &[trim_whitespace, strip_protocol_prefix];

/// Namespace detection, first match wins
pub const NAMESPACE_RULES: &[NormalizeRule] = &[
    NormalizeRule {
        name: "qualified-type",
        apply: strip_qualified_type_prefix,
    },
    NormalizeRule {
        name: "dotted-package",
        apply: strip_dotted_package,
    },
];

pub fn trim_whitespace(name: &str) -> Cow<'_, str> {
    Cow::Borrowed(name.trim())
}

pub fn strip_leading_separators(name: &str) -> Cow<'_, str> {
    LEADING_SEPARATORS.replace(name, "")
}

pub fn strip_protocol_prefix(name: &str) -> Cow<'_, str> {
    PROTOCOL_PREFIX.replace(name, "")
}

pub fn strip_namespace(name: &str) -> Cow<'_, str> {
    NAMESPACE_RULES
        .iter()
        .find_map(|rule| (rule.apply)(name))
        .map(Cow::Owned)
        .unwrap_or(Cow::Borrowed(name))
}

/// `com.example.UserService/Get` -> `UserService/Get`
pub fn strip_qualified_type_prefix(name: &str) -> Option<String> {
    if !QUALIFIED_NAME.is_match(name) {
        return None;
    }
    Some(NAMESPACE_PREFIX.replace(name, "").into_owned())
}

/// `com.example.foo.9x.Bar` -> `Bar`, `com.example.foo.bar` -> `foo.bar`
pub fn strip_dotted_package(name: &str) -> Option<String> {
    if !name.contains('.') {
        return None;
    }

    let mut parts: Vec<&str> = name.split('.').collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }

    if parts.len() <= 2 {
        return None;
    }

    let prefix_len = (parts.len() - 1).min(3);
    if !parts[..prefix_len]
        .iter()
        .all(|p| LOWERCASE_SEGMENT.is_match(p))
    {
        return None;
    }

    let joined = match parts
        .iter()
        .position(|p| p.starts_with(|c: char| c.is_ascii_uppercase()))
    {
        Some(i) => parts[i..].join("."),
        None => parts[parts.len() - 2..].join("."),
    };
    Some(joined)
}

/// Remove a Kubernetes/Docker style hash suffix
pub fn strip_hash_suffix(name: &str) -> Cow<'_, str> {
    HASH_SUFFIX.replace(name, "")
}
