//! Shared HTTP client for the completion endpoint
//!
//! One `reqwest::Client` is built per backend and reused for every request,
//! with a per-request timeout and a bounded retry policy.

use reqwest::{Client, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use talequiz_utils::error::ConnectivityError;
use talequiz_utils::redaction::redact_error_message;

/// Default connect timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Backoff unit; attempt `n` waits `n` units before retrying
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// HTTP client with timeout and retry policy.
///
/// - 5xx and network failures are retried up to `max_retries` times
/// - 4xx responses are never retried
/// - timeouts are reported immediately
#[derive(Clone)]
pub(crate) struct HttpClient {
    client: Arc<Client>,
    max_retries: u32,
}

impl HttpClient {
    /// # Errors
    ///
    /// Returns `ConnectivityError::Misconfiguration` if the client cannot be constructed
    pub fn new(max_retries: u32) -> Result<Self, ConnectivityError> {
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| {
                ConnectivityError::Misconfiguration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client: Arc::new(client),
            max_retries,
        })
    }

    /// Start a POST request on the shared client
    pub fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.post(url)
    }

    /// Execute an HTTP request with timeout and retry policy
    ///
    /// # Errors
    ///
    /// - `ProviderAuth` for 401/403
    /// - `ProviderQuota` for 429
    /// - `Status` for any other non-success status that is not 5xx
    /// - `ProviderOutage` for 5xx after retries
    /// - `Timeout` when the request exceeds `timeout`
    /// - `Transport` for network errors after retries
    pub async fn execute_with_retry(
        &self,
        request_builder: reqwest::RequestBuilder,
        timeout: Duration,
        provider_name: &str,
    ) -> Result<Response, ConnectivityError> {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let request = request_builder
                .try_clone()
                .ok_or_else(|| {
                    ConnectivityError::Transport("Failed to clone request for retry".to_string())
                })?
                .timeout(timeout)
                .build()
                .map_err(|e| ConnectivityError::Transport(format!("Failed to build request: {e}")))?;

            debug!(
                provider = provider_name,
                attempt = attempt,
                timeout_secs = timeout.as_secs(),
                "Executing HTTP request"
            );

            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return Ok(response);
                    }

                    if status.is_server_error() {
                        if attempt <= self.max_retries {
                            warn!(
                                provider = provider_name,
                                attempt = attempt,
                                status = status.as_u16(),
                                "Server error, will retry"
                            );
                            tokio::time::sleep(INITIAL_BACKOFF * attempt).await;
                            continue;
                        }
                        return Err(ConnectivityError::ProviderOutage(format!(
                            "{provider_name} returned server error: {status}"
                        )));
                    }

                    return Err(map_status_error(status, provider_name));
                }
                Err(e) => {
                    if e.is_timeout() {
                        return Err(ConnectivityError::Timeout { duration: timeout });
                    }

                    let sanitized = redact_error_message(&e.to_string());
                    if attempt <= self.max_retries {
                        warn!(
                            provider = provider_name,
                            attempt = attempt,
                            error = %sanitized,
                            "Network error, will retry"
                        );
                        tokio::time::sleep(INITIAL_BACKOFF * attempt).await;
                        continue;
                    }

                    return Err(ConnectivityError::Transport(format!(
                        "{provider_name} request failed: {sanitized}"
                    )));
                }
            }
        }
    }
}

/// Map a non-success, non-5xx status to a `ConnectivityError`
fn map_status_error(status: StatusCode, provider_name: &str) -> ConnectivityError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ConnectivityError::ProviderAuth(
            format!("{provider_name} authentication failed: {status}"),
        ),
        StatusCode::TOO_MANY_REQUESTS => ConnectivityError::ProviderQuota(format!(
            "{provider_name} rate limit exceeded: {status}"
        )),
        _ => ConnectivityError::Status {
            status: status.as_u16(),
            message: format!("{provider_name} returned {status}"),
        },
    }
}
