//! Rate-limited, retrying client for the dashboard API.

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::rate_limiter::RateLimiter;
use crate::config::ApiSettings;
use crate::error::{AuditError, RemoteError, TransportError};

const API_KEY_HEADER: &str = "X-Cisco-Meraki-API-Key";

/// One outbound call, relative to the API base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        ApiRequest {
            method: Method::GET,
            path: path.into(),
            params: Vec::new(),
        }
    }
}

/// Performs a single attempt of a request.
///
/// Implementations report every failure as a [`TransportError`]; retrying
/// and rate limiting are the client's job.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<Value, TransportError>;
}

/// HTTPS transport backed by reqwest.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(api_key: &str, settings: &ApiSettings) -> Result<Self, AuditError> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .user_agent(concat!("meraki-health-check/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AuditError::Client(e.to_string()))?;

        Ok(HttpTransport {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<Value, TransportError> {
        let response = self
            .http
            .request(request.method.clone(), self.url(&request.path))
            .header(API_KEY_HEADER, &self.api_key)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&request.params)
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// Fixed-interval retry policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first
    pub max_retries: u32,
    /// Pause between consecutive attempts
    pub retry_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 3,
            retry_interval: Duration::from_secs(1),
        }
    }
}

/// Client shared by every check in a run.
pub struct RemoteClient {
    transport: Box<dyn Transport>,
    limiter: RateLimiter,
    retry: RetryPolicy,
}

impl RemoteClient {
    pub fn new(transport: Box<dyn Transport>, limiter: RateLimiter, retry: RetryPolicy) -> Self {
        RemoteClient {
            transport,
            limiter,
            retry,
        }
    }

    /// Build an HTTPS client from the `api` section of the config.
    pub fn from_settings(api_key: &str, settings: &ApiSettings) -> Result<Self, AuditError> {
        let transport = HttpTransport::new(api_key, settings)?;
        Ok(RemoteClient::new(
            Box::new(transport),
            RateLimiter::new(settings.rate_limit, settings.rate_window()),
            RetryPolicy {
                max_retries: settings.max_retries,
                retry_interval: settings.retry_delay(),
            },
        ))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Issue a request, retrying every failed attempt.
    ///
    /// Each attempt takes a token from the bucket first. After the last
    /// attempt fails, the final transport error is wrapped into a
    /// high-severity [`RemoteError`].
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, RemoteError> {
        let request = ApiRequest {
            method,
            path: path.to_string(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        };
        self.execute(&request).await
    }

    async fn execute(&self, request: &ApiRequest) -> Result<Value, RemoteError> {
        let attempts = self.retry.max_retries.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            self.limiter.acquire().await;
            debug!(method = %request.method, path = %request.path, attempt, "sending request");

            match self.transport.send(request).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!(
                        path = %request.path,
                        attempt,
                        max_attempts = attempts,
                        error = %e,
                        "API request failed"
                    );
                    last_error = Some(e);
                    if attempt < attempts {
                        tokio::time::sleep(self.retry.retry_interval).await;
                    }
                }
            }
        }

        let cause = last_error.map(|e| e.to_string()).unwrap_or_default();
        Err(RemoteError::api(format!(
            "API request failed after {attempts} attempts: {cause}"
        )))
    }

    /// GET `path` and decode the body into `T`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RemoteError> {
        let value = self.execute(&ApiRequest::get(path)).await?;
        serde_json::from_value(value)
            .map_err(|e| RemoteError::api(format!("unexpected response from {path}: {e}")))
    }
}
