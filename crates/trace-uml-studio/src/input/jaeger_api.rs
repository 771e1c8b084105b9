//! HTTP client for the Jaeger query service.

use super::parser::parse_traces;
use super::types::{ApiErrorEntry, ApiResponse};
use super::TraceReader;
use crate::model::Trace;
use crate::utils::config::JaegerConfig;
use crate::utils::error::{ApiError, InputError};
use log::{debug, info};
use reqwest::blocking::Client;

/// Fetches traces from `GET {url}/api/traces`
pub struct JaegerApiClient {
    client: Client,
    base_url: String,
    config: JaegerConfig,
}

impl JaegerApiClient {
    /// Create a client from query options
    ///
    /// The request timeout comes from `config.timeout_secs`. No retries are made.
    pub fn new(config: JaegerConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ApiError::RequestFailed)?;

        Ok(Self {
            client,
            base_url: normalize_base_url(&config.url),
            config,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/traces", self.base_url)
    }

    /// Fetch and parse traces
    ///
    /// # Errors
    /// * `ApiError::RequestFailed` - transport error or timeout
    /// * `ApiError::InvalidResponse` - non-2xx status or unparseable body
    /// * `ApiError::QueryFailed` - Jaeger returned a populated `errors` array
    pub fn fetch_traces(&self) -> Result<Vec<Trace>, ApiError> {
        let url = self.endpoint();
        info!("Fetching traces from Jaeger: {}", url);

        let params = build_query(&self.config);
        debug!("Query parameters: {:?}", params);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .map_err(ApiError::RequestFailed)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::InvalidResponse(format!(
                "HTTP {}: {}",
                status,
                response.text().unwrap_or_default()
            )));
        }

        let body: ApiResponse = response.json().map_err(ApiError::RequestFailed)?;

        if let Some(errors) = body.errors.as_deref().filter(|e| !e.is_empty()) {
            return Err(map_api_errors(errors));
        }

        let mut traces = match body.data {
            Some(data) if !data.is_null() => {
                parse_traces(data).map_err(|e| ApiError::InvalidResponse(e.to_string()))?
            }
            _ => Vec::new(),
        };

        if let Some(service) = &self.config.service {
            for trace in &mut traces {
                trace.source_name = Some(service.clone());
            }
        }

        info!("Fetched {} trace(s) from Jaeger API", traces.len());
        Ok(traces)
    }
}

impl TraceReader for JaegerApiClient {
    fn read_traces(&self) -> Result<Vec<Trace>, InputError> {
        Ok(self.fetch_traces()?)
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Query string for `/api/traces`
fn build_query(config: &JaegerConfig) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(service) = &config.service {
        params.push(("service", service.clone()));
    }
    if let Some(operation) = &config.operation {
        params.push(("operation", operation.clone()));
    }
    params.push(("limit", config.limit.to_string()));
    params.push(("lookback", config.lookback.clone()));
    params
}

fn map_api_errors(errors: &[ApiErrorEntry]) -> ApiError {
    let message = errors
        .iter()
        .map(|e| match &e.trace_id {
            Some(id) => format!("{} ({}, trace {})", e.msg, e.code, id),
            None => format!("{} ({})", e.msg, e.code),
        })
        .collect::<Vec<_>>()
        .join("; ");
    ApiError::QueryFailed(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("http://jaeger:16686/"), "http://jaeger:16686");
        assert_eq!(normalize_base_url("http://jaeger:16686//"), "http://jaeger:16686");
        assert_eq!(normalize_base_url("http://jaeger:16686"), "http://jaeger:16686");
    }

    #[test]
    fn test_build_query_defaults() {
        let params = build_query(&JaegerConfig::default());
        assert_eq!(
            params,
            vec![("limit", "100".to_string()), ("lookback", "24h".to_string())]
        );
    }

    #[test]
    fn test_build_query_with_filters() {
        let config = JaegerConfig {
            service: Some("frontend".into()),
            operation: Some("GET /".into()),
            limit: 5,
            ..JaegerConfig::default()
        };
        let params = build_query(&config);
        assert_eq!(params[0], ("service", "frontend".to_string()));
        assert_eq!(params[1], ("operation", "GET /".to_string()));
        assert_eq!(params[2], ("limit", "5".to_string()));
    }

    #[test]
    fn test_map_api_errors() {
        let err = map_api_errors(&[
            ApiErrorEntry {
                code: 404,
                msg: "trace not found".into(),
                trace_id: Some("abc".into()),
            },
            ApiErrorEntry {
                code: 500,
                msg: "storage".into(),
                trace_id: None,
            },
        ]);
        let text = err.to_string();
        assert!(text.contains("trace not found (404, trace abc)"));
        assert!(text.contains("storage (500)"));
    }

    #[test]
    fn test_endpoint() {
        let client = JaegerApiClient::new(JaegerConfig {
            url: "http://localhost:16686/".into(),
            ..JaegerConfig::default()
        })
        .unwrap();
        assert_eq!(client.endpoint(), "http://localhost:16686/api/traces");
    }
}
