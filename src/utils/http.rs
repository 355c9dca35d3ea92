//! HTTP client utilities and the retrying fetcher used by every E-utilities call.

use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use super::retry::RetryConfig;
use crate::config::PubmedConfig;
use crate::sources::{mentions_rate_limit, SourceError};

/// Shared HTTP client with sensible defaults
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, SourceError> {
        Self::with_user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
    }

    /// Create a new HTTP client with a custom user agent
    pub fn with_user_agent(user_agent: &str) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| SourceError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Get the underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Transport-level result of one successful HTTP attempt
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

/// Build a URL-encoded query string from parameters
pub fn encode_params(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// HTTP GET with per-attempt timeout, exponential backoff and a mandatory
/// post-success delay.
///
/// Dropping the returned future aborts the in-flight request and any pending
/// backoff sleep.
#[derive(Debug, Clone)]
pub struct ResilientFetcher {
    client: HttpClient,
    retry: RetryConfig,
    api_key: Option<String>,
    request_delay: Duration,
}

impl ResilientFetcher {
    /// Create a fetcher from the PubMed configuration
    pub fn new(client: HttpClient, config: &PubmedConfig) -> Self {
        Self {
            client,
            retry: RetryConfig::from_config(config),
            api_key: config.api_key.clone().filter(|_| config.has_api_key()),
            request_delay: config.request_delay(),
        }
    }

    /// GET `endpoint` with `params`, retrying transient failures.
    ///
    /// Returns the last error once all attempts are spent.
    pub async fn fetch_with_retry(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        timeout: Duration,
    ) -> Result<RawResponse, SourceError> {
        // Logged separately so the key never reaches the logs
        let public_query = encode_params(params);

        let mut all_params = params.to_vec();
        if let Some(key) = &self.api_key {
            all_params.push(("api_key", key.clone()));
        }
        let url = format!("{}?{}", endpoint, encode_params(&all_params));

        let mut attempt = 0;
        loop {
            tracing::debug!(endpoint, query = %public_query, attempt, "Sending request");

            match self.attempt(&url, timeout).await {
                Ok(response) => {
                    if attempt > 0 {
                        tracing::info!(
                            endpoint,
                            "Request succeeded on attempt {} after {} transient failures",
                            attempt + 1,
                            attempt
                        );
                    }
                    if !self.request_delay.is_zero() {
                        sleep(self.request_delay).await;
                    }
                    return Ok(response);
                }
                Err(error) => {
                    if !error.is_transient() || !self.retry.has_attempts_left(attempt) {
                        tracing::warn!(
                            endpoint,
                            attempts = attempt + 1,
                            "Request failed: {}",
                            error
                        );
                        return Err(error);
                    }

                    let delay = self.retry.delay_for(attempt, error.is_rate_limited());
                    tracing::warn!(
                        endpoint,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "Transient error, retrying: {}",
                        error
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn attempt(&self, url: &str, timeout: Duration) -> Result<RawResponse, SourceError> {
        let response = self
            .client
            .client()
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_transport_error(e, timeout))?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or("").to_string();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = response
            .text()
            .await
            .map_err(|e| classify_transport_error(e, timeout))?;

        if !status.is_success() {
            let message = if body.trim().is_empty() {
                status_text
            } else {
                body.chars().take(200).collect()
            };
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS || mentions_rate_limit(&message) {
                return Err(SourceError::RateLimit(format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    message
                )));
            }
            return Err(SourceError::Http {
                status: status.as_u16(),
                message,
            });
        }

        Ok(RawResponse {
            status: status.as_u16(),
            status_text,
            headers,
            body,
        })
    }
}

fn classify_transport_error(err: reqwest::Error, timeout: Duration) -> SourceError {
    let err = err.without_url();
    if err.is_timeout() {
        SourceError::Timeout(timeout)
    } else {
        SourceError::from(err)
    }
}
