//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Exponential backoff retry logic (max 3 retries)
//! - Rate limit error handling

use crate::error::RegistryError;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Default timeout for HTTP requests (30 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("mvn-updates/", env!("CARGO_PKG_VERSION"));

/// Maximum number of retry attempts
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BASE_DELAY_MS: u64 = 100;

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                RegistryError::network_error(
                    "",
                    "HTTP client",
                    format!("failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
        })
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Perform a GET request with retry logic and error context
    ///
    /// A 404 is reported as [`RegistryError::ArtifactNotFound`] without retrying.
    pub async fn get_with_context(
        &self,
        url: &str,
        artifact: &str,
        repository: &str,
    ) -> Result<reqwest::Response, RegistryError> {
        let mut last_error = None;
        let mut delay = BASE_DELAY_MS;

        for attempt in 0..=self.max_retries {
            debug!(url, attempt, "GET");
            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(RegistryError::RateLimitExceeded {
                            repository: repository.to_string(),
                        });

                        if attempt < self.max_retries {
                            tokio::time::sleep(Duration::from_millis(delay)).await;
                            delay *= 2;
                            continue;
                        }
                        break;
                    }

                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(RegistryError::artifact_not_found(artifact, repository));
                    }

                    if !status.is_success() {
                        return Err(RegistryError::network_error(
                            artifact,
                            repository,
                            format!("HTTP {}", status),
                        ));
                    }

                    return Ok(response);
                }
                Err(e) => {
                    if e.is_timeout() {
                        last_error = Some(RegistryError::timeout(artifact, repository));
                    } else {
                        last_error = Some(RegistryError::network_error(
                            artifact,
                            repository,
                            e.to_string(),
                        ));
                    }

                    if attempt < self.max_retries {
                        debug!(url, attempt, delay_ms = delay, "request failed, retrying");
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                        delay *= 2;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            RegistryError::network_error(artifact, repository, "unknown error")
        }))
    }

    /// Perform a GET request and get text response with retry on body errors
    pub async fn get_text(
        &self,
        url: &str,
        artifact: &str,
        repository: &str,
    ) -> Result<String, RegistryError> {
        let mut last_error = None;
        let mut delay = BASE_DELAY_MS;

        for attempt in 0..=self.max_retries {
            // status errors are already retried in get_with_context
            let response = self.get_with_context(url, artifact, repository).await?;

            match response.text().await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    last_error = Some(RegistryError::invalid_response(
                        artifact,
                        repository,
                        format!("failed to get text response: {}", e),
                    ));

                    if attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                        delay *= 2;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            RegistryError::invalid_response(artifact, repository, "unknown text parse error")
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
    }

    #[test]
    fn test_http_client_with_config() {
        let client = HttpClient::with_config(Duration::from_secs(60), "test-agent/1.0");
        assert!(client.is_ok());
    }

    #[test]
    fn test_http_client_with_max_retries() {
        let client = HttpClient::new().unwrap().with_max_retries(5);
        assert_eq!(client.max_retries, 5);
    }

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(30));
        assert!(DEFAULT_USER_AGENT.starts_with("mvn-updates/"));
        assert_eq!(MAX_RETRIES, 3);
        assert_eq!(BASE_DELAY_MS, 100);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let client = HttpClient::with_config(Duration::from_secs(2), "test-agent/1.0")
            .unwrap()
            .with_max_retries(0);
        let err = client
            .get_text("http://127.0.0.1:9/maven-metadata.xml", "g:a", "local")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::NetworkError { .. } | RegistryError::Timeout { .. }
        ));
    }
}
