//! HTTP query service client.
//!
//! Implements the QueryService trait over JSON/HTTP with reqwest.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use super::{service_failure, QueryService};
use crate::error::{QueryLensError, Result};
use crate::payload::{ErrorBody, QueryRequest, ResponsePayload};

/// Default query endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/api/query";

/// Default timeout for query requests. Queries involve several model calls
/// on the service side, so this is generous.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpServiceConfig {
    /// Full URL of the query endpoint.
    pub endpoint: Url,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl HttpServiceConfig {
    /// Creates a config for the given endpoint URL.
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| QueryLensError::config(format!("Invalid endpoint '{endpoint}': {e}")))?;

        if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
            return Err(QueryLensError::config(format!(
                "Invalid endpoint scheme '{}'. Expected 'http' or 'https'",
                endpoint.scheme()
            )));
        }

        Ok(Self {
            endpoint,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Root of the service (the endpoint with its path stripped).
    pub fn root_url(&self) -> Url {
        let mut root = self.endpoint.clone();
        root.set_path("/");
        root.set_query(None);
        root
    }
}

impl Default for HttpServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Query service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpQueryService {
    config: HttpServiceConfig,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct Greeting {
    message: String,
}

impl HttpQueryService {
    /// Creates a new client with the given configuration.
    pub fn new(config: HttpServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| QueryLensError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Returns the configured endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.config.endpoint
    }

    /// Maps a request-level failure to a transport error.
    fn request_error(&self, e: reqwest::Error) -> QueryLensError {
        if e.is_timeout() {
            QueryLensError::transport(format!(
                "Request timed out after {}s.",
                self.config.timeout_secs
            ))
        } else if e.is_connect() {
            QueryLensError::transport(format!(
                "Could not reach the query service at {}.",
                self.config.endpoint
            ))
        } else {
            QueryLensError::transport(format!("Request failed: {e}"))
        }
    }

    /// Builds the error for a non-success response body.
    fn parse_failure(status: StatusCode, body: &str) -> QueryLensError {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail);
        service_failure(status.as_u16(), detail.as_ref())
    }
}

#[async_trait]
impl QueryService for HttpQueryService {
    async fn query(&self, request: &QueryRequest) -> Result<ResponsePayload> {
        debug!(endpoint = %self.config.endpoint, "Sending query request");

        let response = self
            .client
            .post(self.config.endpoint.clone())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| QueryLensError::transport(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            warn!(%status, "Query service returned an error");
            return Err(Self::parse_failure(status, &body));
        }

        info!(%status, bytes = body.len(), "Query service responded");
        ResponsePayload::from_json(&body).map_err(|e| {
            QueryLensError::transport(format!("Malformed response from query service: {e}"))
        })
    }

    async fn health(&self) -> Result<String> {
        let root = self.config.root_url();
        let response = self
            .client
            .get(root.clone())
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| QueryLensError::transport(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(Self::parse_failure(status, &body));
        }

        Ok(serde_json::from_str::<Greeting>(&body)
            .map(|g| g.message)
            .unwrap_or(body))
    }
}
