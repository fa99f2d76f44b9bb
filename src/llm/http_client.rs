// src/llm/http_client.rs
// HTTP transport for the generator: bounded timeouts, exactly one attempt

use anyhow::{Result, anyhow};
use reqwest::Client;
use std::time::Duration;
use tracing::warn;

/// Default request timeout when creating from an existing client
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Default connect timeout when creating from an existing client
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Longest error body echoed back in diagnostics
const MAX_ERROR_BODY_CHARS: usize = 500;

pub struct LlmHttpClient {
    client: Client,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl LlmHttpClient {
    pub fn new(request_timeout: Duration, connect_timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            request_timeout,
            connect_timeout,
        }
    }

    /// Create from an existing reqwest::Client
    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// POST `body` with Bearer auth plus any extra headers.
    /// Returns the response body on a 2xx status.
    pub async fn execute(
        &self,
        request_id: &str,
        url: &str,
        api_key: &str,
        extra_headers: &[(&str, &str)],
        body: String,
    ) -> Result<String> {
        self.execute_request(request_id, body, |client, body| {
            let mut request = client
                .post(url)
                .header("Authorization", format!("Bearer {}", api_key))
                .header("Content-Type", "application/json");
            for (name, value) in extra_headers {
                request = request.header(*name, *value);
            }
            request.body(body)
        })
        .await
    }

    /// Send a request built by `build_request`. Non-success statuses and
    /// transport failures are returned as errors; nothing is retried.
    pub async fn execute_request<F>(
        &self,
        request_id: &str,
        body: String,
        build_request: F,
    ) -> Result<String>
    where
        F: FnOnce(&Client, String) -> reqwest::RequestBuilder,
    {
        let response = build_request(&self.client, body)
            .send()
            .await
            .map_err(|e| {
                warn!(request_id = %request_id, error = %e, "Generator request failed");
                anyhow!("Request failed: {}", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let error_body: String = error_body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            warn!(
                request_id = %request_id,
                status = %status,
                error = %error_body,
                "Generator returned an error status"
            );
            return Err(anyhow!("API request failed: {} {}", status.as_u16(), error_body));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Construction
    // ========================================================================

    #[test]
    fn test_client_creation() {
        let client = LlmHttpClient::new(Duration::from_secs(10), Duration::from_secs(5));
        assert_eq!(client.request_timeout, Duration::from_secs(10));
        assert_eq!(client.connect_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_from_client() {
        let client = LlmHttpClient::from_client(Client::new());
        assert_eq!(client.request_timeout, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
        assert_eq!(client.connect_timeout, Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));
        let _inner = client.inner();
    }

    // ========================================================================
    // Failure paths (requires tokio + actual HTTP)
    // ========================================================================

    #[tokio::test]
    async fn test_execute_connection_refused() {
        let client = LlmHttpClient::new(Duration::from_millis(500), Duration::from_millis(200));
        let result = client
            .execute("test", "http://127.0.0.1:1", "key", &[], "{}".into())
            .await;
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Request failed"), "Expected transport error, got: {}", err);
    }

    #[tokio::test]
    async fn test_execute_request_custom_builder() {
        let client = LlmHttpClient::new(Duration::from_millis(500), Duration::from_millis(200));
        let result = client
            .execute_request("test", "{}".into(), |c, body| {
                c.post("http://127.0.0.1:1")
                    .header("Content-Type", "application/json")
                    .body(body)
            })
            .await;
        assert!(result.is_err());
    }
}
