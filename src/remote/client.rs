//! HTTP client for the remote resource API.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::models::{RawRecord, ResourceKind, TransportError};
use super::RemoteFetcher;

/// HTTP client fetching resource collections as JSON arrays.
pub struct JsonApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl JsonApiClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the remote API (e.g., "http://jsonplaceholder.typicode.com")
    /// * `timeout_sec` - Request timeout in seconds
    pub fn new(base_url: String, timeout_sec: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .expect("Failed to create HTTP client");

        // Ensure base_url doesn't have trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        Self { client, base_url }
    }

    /// Get the base URL of the remote API.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RemoteFetcher for JsonApiClient {
    async fn fetch(&self, kind: ResourceKind) -> Result<Vec<RawRecord>, TransportError> {
        let url = format!("{}/{}", self.base_url, kind.endpoint());

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TransportError::Connect {
                kind,
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(TransportError::Status {
                kind,
                status: response.status().as_u16(),
            });
        }

        let body: Vec<serde_json::Value> =
            response.json().await.map_err(|e| TransportError::Decode {
                kind,
                message: e.to_string(),
            })?;

        let total = body.len();
        let records: Vec<RawRecord> = body.into_iter().filter_map(RawRecord::from_value).collect();
        if records.len() < total {
            debug!(
                "Dropped {} non-object elements from {} response",
                total - records.len(),
                kind
            );
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = JsonApiClient::new("http://jsonplaceholder.typicode.com".to_string(), 30);
        assert_eq!(client.base_url(), "http://jsonplaceholder.typicode.com");
    }

    #[test]
    fn test_trailing_slash_removal() {
        let client = JsonApiClient::new("http://jsonplaceholder.typicode.com/".to_string(), 30);
        assert_eq!(client.base_url(), "http://jsonplaceholder.typicode.com");
    }
}
