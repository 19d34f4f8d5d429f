//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Optional access token sent as `Authorization: token ...`
//! - Exponential backoff retry logic (max 3 retries)
//! - Status mapping to FetchError (404, 401/403, 429)

use crate::error::FetchError;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use tracing::debug;

/// Default timeout for HTTP requests (30 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("tfbump/", env!("CARGO_PKG_VERSION"));

/// Maximum number of retry attempts
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BASE_DELAY_MS: u64 = 100;

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                FetchError::network_error("", format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
            token: None,
        })
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the access token sent with every request
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Returns true if requests carry an access token
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Perform a GET request with retry logic
    pub async fn get(&self, url: &str, accept: &str) -> Result<reqwest::Response, FetchError> {
        let host = host_of(url);
        let mut last_error = None;
        let mut delay = BASE_DELAY_MS;

        for attempt in 0..=self.max_retries {
            let mut request = self.client.get(url).header(ACCEPT, accept);
            if let Some(token) = &self.token {
                request = request.header(AUTHORIZATION, format!("token {}", token));
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(FetchError::RateLimitExceeded { host: host.clone() });

                        if attempt < self.max_retries {
                            tokio::time::sleep(Duration::from_millis(delay)).await;
                            delay *= 2;
                            continue;
                        }
                        break;
                    }

                    if status == StatusCode::NOT_FOUND {
                        return Err(FetchError::path_not_found(url, host));
                    }

                    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                        return Err(FetchError::AuthenticationError {
                            host,
                            message: format!("HTTP {}", status),
                        });
                    }

                    if !status.is_success() {
                        return Err(FetchError::network_error(url, format!("HTTP {}", status)));
                    }

                    return Ok(response);
                }
                Err(e) => {
                    if e.is_timeout() {
                        last_error = Some(FetchError::timeout(url));
                    } else {
                        last_error = Some(FetchError::network_error(url, e.to_string()));
                    }

                    if attempt < self.max_retries {
                        debug!(url, attempt, "request failed, retrying");
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                        delay *= 2;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| FetchError::network_error(url, "unknown error")))
    }

    /// Perform a GET request and parse the JSON body
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        accept: &str,
    ) -> Result<T, FetchError> {
        let response = self.get(url, accept).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::InvalidResponse {
                url: url.to_string(),
                message: format!("failed to parse JSON: {}", e),
            })
    }

    /// Perform a GET request and return the body as text
    pub async fn get_text(&self, url: &str, accept: &str) -> Result<String, FetchError> {
        let response = self.get(url, accept).await?;
        response.text().await.map_err(|e| FetchError::InvalidResponse {
            url: url.to_string(),
            message: format!("failed to get text response: {}", e),
        })
    }
}

fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}
