//! Node inference rules, evaluated in order, first match wins.

use crate::model::{Metadata, TagValue};
use crate::normalize::extract_base_name;
use crate::utils::config::{
    CONTAINER_ID_KEY, CONTAINER_ID_SHORT_LEN, CONTAINER_NAME_KEY, HOST_IP_KEY, HOST_KEYS,
    POD_NAME_KEYS,
};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Node id for services without any metadata
pub const UNKNOWN_NODE: &str = "Node-Unknown";

/// Maps service metadata to a node id, `None` when the rule does not apply
pub type NodeMatcher = fn(&Metadata) -> Option<String>;

#[derive(Debug, Clone, Copy)]
pub struct NodeRule {
    pub name: &'static str,
    pub apply: NodeMatcher,
}

/// Platform conventions, most specific first
pub const NODE_RULES: &[NodeRule] = &[
    NodeRule {
        name: "kubernetes-pod",
        apply: pod_name,
    },
    NodeRule {
        name: "docker-container-name",
        apply: container_name,
    },
    NodeRule {
        name: "docker-container-id",
        apply: container_id,
    },
    NodeRule {
        name: "host-identifier",
        apply: host_identifier,
    },
    NodeRule {
        name: "host-ip",
        apply: host_ip,
    },
];

/// First present (truthy) value among `keys`, rendered to a string
pub(crate) fn first_present(metadata: &Metadata, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| metadata.get(*key))
        .find(|value| value.is_truthy())
        .map(TagValue::to_string)
}

pub fn pod_name(metadata: &Metadata) -> Option<String> {
    first_present(metadata, POD_NAME_KEYS).map(|name| extract_base_name(&name))
}

pub fn container_name(metadata: &Metadata) -> Option<String> {
    first_present(metadata, &[CONTAINER_NAME_KEY]).map(|name| extract_base_name(&name))
}

pub fn container_id(metadata: &Metadata) -> Option<String> {
    first_present(metadata, &[CONTAINER_ID_KEY]).map(|id| {
        let short: String = id.chars().take(CONTAINER_ID_SHORT_LEN).collect();
        format!("Container-{}", short)
    })
}

pub fn host_identifier(metadata: &Metadata) -> Option<String> {
    first_present(metadata, HOST_KEYS)
}

pub fn host_ip(metadata: &Metadata) -> Option<String> {
    first_present(metadata, &[HOST_IP_KEY]).map(|ip| format!("Host-{}", ip))
}

/// Opaque grouping key for metadata no rule recognised
///
/// Stable for identical metadata within one build; not a durable identifier.
pub fn hashed_node(metadata: &Metadata) -> String {
    if metadata.is_empty() {
        return UNKNOWN_NODE.to_string();
    }

    let mut hasher = DefaultHasher::new();
    for (key, value) in metadata {
        key.hash(&mut hasher);
        value.to_string().hash(&mut hasher);
    }
    format!("Node-{}", hasher.finish() % 10_000)
}
