//! HTTP Client Implementation using Reqwest

use async_trait::async_trait;
use migrate_traits::{
    error::{Result, TransportError},
    http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy},
};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Reqwest-based HTTP client implementation
///
/// Provides HTTP operations with:
/// - Connection pooling via reqwest
/// - Automatic retry with exponential backoff on 429 and 5xx
/// - TLS support by default
/// - Streaming server-to-server piping without payload buffering
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a new HTTP client with custom timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .user_agent("media-migration-core/0.1.0")
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Convert abstract HttpMethod to reqwest Method
    fn convert_method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }

    /// Build reqwest request from abstract request
    fn build_request(&self, request: HttpRequest) -> reqwest::RequestBuilder {
        let method = Self::convert_method(request.method);
        let mut req = self.client.request(method, &request.url);

        for (key, value) in request.headers {
            req = req.header(key, value);
        }

        if let Some(body) = request.body {
            req = req.body(body);
        }

        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        req
    }

    /// Collect a reqwest response into the abstract response type
    async fn collect_response(response: reqwest::Response) -> Result<HttpResponse> {
        let status = response.status().as_u16();

        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|s| (k.to_string(), s.to_string())))
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    /// Execute request with retry logic
    async fn execute_with_retry_internal(
        &self,
        request: HttpRequest,
        policy: RetryPolicy,
    ) -> Result<HttpResponse> {
        let mut attempt = 0;
        let mut last_error = None;

        while attempt < policy.max_attempts {
            debug!(
                attempt = attempt + 1,
                max_attempts = policy.max_attempts,
                url = %request.url,
                "Executing HTTP request"
            );

            let req_builder = self.build_request(request.clone());

            match req_builder.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();

                    if status >= 500 || status == 429 {
                        warn!(
                            status = status,
                            attempt = attempt + 1,
                            "HTTP request failed with retryable status"
                        );
                        last_error = Some(TransportError::Http {
                            status,
                            message: format!("HTTP {} error", status),
                        });
                    } else {
                        // Success or non-retryable error
                        return Self::collect_response(response).await;
                    }
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        attempt = attempt + 1,
                        "HTTP request failed"
                    );

                    if e.is_timeout() {
                        last_error = Some(TransportError::Network("Request timed out".to_string()));
                    } else if e.is_connect() {
                        last_error =
                            Some(TransportError::Network(format!("Connection failed: {}", e)));
                    } else {
                        last_error = Some(TransportError::Network(e.to_string()));
                    }
                }
            }

            attempt += 1;

            // If we're going to retry, wait with exponential backoff
            if attempt < policy.max_attempts {
                let delay = if policy.use_exponential_backoff {
                    let exponential_delay = policy.base_delay * 2u32.pow(attempt - 1);
                    exponential_delay.min(policy.max_delay)
                } else {
                    policy.base_delay
                };

                debug!(delay_ms = delay.as_millis(), "Retrying after delay");
                sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            TransportError::Network("All retry attempts exhausted".to_string())
        }))
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.execute_with_retry(request, RetryPolicy::default())
            .await
    }

    async fn execute_with_retry(
        &self,
        request: HttpRequest,
        policy: RetryPolicy,
    ) -> Result<HttpResponse> {
        self.execute_with_retry_internal(request, policy).await
    }

    async fn pipe(&self, source_url: String, request: HttpRequest) -> Result<HttpResponse> {
        debug!(source_url = %source_url, upload_url = %request.url, "Piping source bytes");

        let source = self
            .client
            .get(&source_url)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !source.status().is_success() {
            return Err(TransportError::Http {
                status: source.status().as_u16(),
                message: "Source fetch failed".to_string(),
            });
        }

        let body = reqwest::Body::wrap_stream(source.bytes_stream());

        let method = Self::convert_method(request.method);
        let mut req = self.client.request(method, &request.url);

        for (key, value) in request.headers {
            req = req.header(key, value);
        }

        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        let response = req
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Self::collect_response(response).await
    }
}
