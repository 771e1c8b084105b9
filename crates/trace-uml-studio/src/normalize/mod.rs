//! Name normalization shared by every diagram and by node inference.
//!
//! Operation names arrive from many RPC frameworks with inconsistent
//! namespacing (package-qualified Java/Go names, raw gRPC method paths,
//! protocol prefixes). These helpers collapse them to readable
//! `Service/Method` labels and strip deployment hash suffixes.

pub mod rules;

use rules::{Transform, OPERATION_PIPELINE, SERVICE_PIPELINE};

fn run_pipeline(name: &str, pipeline: &[Transform]) -> String {
    pipeline
        .iter()
        .fold(name.to_string(), |acc, step| step(&acc).into_owned())
}

/// Clean an operation name for display
///
/// # Example
/// ```
/// use trace_uml_studio::normalize::clean_operation_name;
/// assert_eq!(
///     clean_operation_name("grpc.hipstershop.ProductService/GetProduct"),
///     "ProductService/GetProduct"
/// );
/// ```
pub fn clean_operation_name(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    run_pipeline(raw, OPERATION_PIPELINE)
}

/// Clean a service name (whitespace and protocol prefix only)
pub fn clean_service_name(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    run_pipeline(raw, SERVICE_PIPELINE)
}

/// Strip a lowercase package/namespace prefix from a qualified name
pub fn detect_and_strip_namespace(name: &str) -> String {
    rules::strip_namespace(name).into_owned()
}

/// Remove a trailing Kubernetes/Docker hash suffix
///
/// `recommendationservice-7d5c8f9b8-xk7pt` -> `recommendationservice`
pub fn extract_base_name(name: &str) -> String {
    rules::strip_hash_suffix(name).into_owned()
}

/// Turn any name into a safe diagram identifier
pub fn sanitize_identifier(name: &str) -> String {
    if name.is_empty() {
        return "unknown".to_string();
    }
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
