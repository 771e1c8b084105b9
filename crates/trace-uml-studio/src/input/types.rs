//! Wire types for the Jaeger query HTTP API (`/api/traces`).

use serde::Deserialize;

/// Response envelope returned by the Jaeger query service
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    /// Traces; parsed later by the payload parser
    #[serde(default)]
    pub data: Option<serde_json::Value>,

    #[serde(default)]
    pub total: u64,

    #[serde(default)]
    pub limit: u64,

    #[serde(default)]
    pub offset: u64,

    #[serde(default)]
    pub errors: Option<Vec<ApiErrorEntry>>,
}

/// One entry of the `errors` array
#[derive(Debug, Deserialize)]
pub struct ApiErrorEntry {
    #[serde(default)]
    pub code: i64,

    #[serde(default)]
    pub msg: String,

    #[serde(rename = "traceID", default)]
    pub trace_id: Option<String>,
}
