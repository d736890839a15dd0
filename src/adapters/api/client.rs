//! Remote Store HTTP Client - Retrying REST API Client
//!
//! Wraps reqwest with bounded concurrency, exponential-backoff retries and
//! API-key authentication for the PostgREST-style remote freebet store.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Configuration for the remote store HTTP client.
#[derive(Debug, Clone)]
pub struct RestClientConfig {
  /// Base URL for the remote store.
  pub base_url: String,
  /// Service API key (sent as `apikey` and bearer token).
  pub api_key: String,
  /// Request timeout.
  pub timeout: Duration,
  /// Maximum concurrent requests.
  pub max_concurrent: usize,
  /// Maximum retries on transient errors.
  pub max_retries: u32,
  /// Base delay between retries (exponential backoff).
  pub retry_base_delay: Duration,
}

impl Default for RestClientConfig {
  fn default() -> Self {
    Self {
      base_url: String::new(),
      api_key: String::new(),
      timeout: Duration::from_secs(10),
      max_concurrent: 4,
      max_retries: 3,
      retry_base_delay: Duration::from_millis(200),
    }
  }
}

/// Retrying HTTP client for the remote freebet store.
pub struct RestClient {
  /// Underlying HTTP client.
  http: Client,
  /// Client configuration.
  config: RestClientConfig,
  /// Concurrency limiter.
  semaphore: Arc<Semaphore>,
}

impl RestClient {
  /// Create a new remote store client.
  pub fn new(config: RestClientConfig) -> Result<Self> {
    let http = Client::builder()
      .timeout(config.timeout)
      .pool_max_idle_per_host(2)
      .build()
      .context("Failed to build HTTP client")?;

    let semaphore = Arc::new(Semaphore::new(config.max_concurrent));

    Ok(Self {
      http,
      config,
      semaphore,
    })
  }

  /// Execute a GET request with auth headers.
  pub async fn get(&self, path: &str) -> Result<Response> {
    let url = format!("{}{}", self.config.base_url, path);
    let request = self.http.get(&url);
    self.execute_with_retry(request, "GET", path).await
  }

  /// Execute a POST request with auth headers, returning the inserted rows.
  pub async fn post(&self, path: &str, body: String) -> Result<Response> {
    let url = format!("{}{}", self.config.base_url, path);
    let request = self
      .http
      .post(&url)
      .header("Content-Type", "application/json")
      .header("Prefer", "return=representation")
      .body(body);
    self.execute_with_retry(request, "POST", path).await
  }

  /// Execute a PATCH request with auth headers, returning the updated rows.
  pub async fn patch(&self, path: &str, body: String) -> Result<Response> {
    let url = format!("{}{}", self.config.base_url, path);
    let request = self
      .http
      .patch(&url)
      .header("Content-Type", "application/json")
      .header("Prefer", "return=representation")
      .body(body);
    self.execute_with_retry(request, "PATCH", path).await
  }

  /// Execute a DELETE request with auth headers, returning the deleted rows.
  pub async fn delete(&self, path: &str) -> Result<Response> {
    let url = format!("{}{}", self.config.base_url, path);
    let request = self
      .http
      .delete(&url)
      .header("Prefer", "return=representation");
    self.execute_with_retry(request, "DELETE", path).await
  }

  /// Execute request with authentication and retries.
  async fn execute_with_retry(
    &self,
    request: RequestBuilder,
    method: &str,
    path: &str,
  ) -> Result<Response> {
    let _permit = self
      .semaphore
      .acquire()
      .await
      .context("Semaphore closed")?;

    let mut last_error = None;

    for attempt in 0..=self.config.max_retries {
      if attempt > 0 {
        let delay = self.config.retry_base_delay * 2u32.pow(attempt - 1);
        debug!(attempt, delay_ms = delay.as_millis(), "Retrying request");
        sleep(delay).await;
      }

      let req = request
        .try_clone()
        .context("Failed to clone request")?
        .header("apikey", &self.config.api_key)
        .header(
          "Authorization",
          format!("Bearer {}", self.config.api_key),
        );

      match req.send().await {
        Ok(response) => match response.status() {
          StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT => {
            return Ok(response);
          }
          StatusCode::TOO_MANY_REQUESTS => {
            warn!(method, path, "Rate limited by remote store, backing off");
            sleep(Duration::from_secs(2)).await;
            last_error = Some(anyhow::anyhow!("Rate limited"));
            continue;
          }
          status if status.is_server_error() => {
            warn!(method, path, status = %status, "Server error, retrying");
            last_error = Some(anyhow::anyhow!("Server error: {status}"));
            continue;
          }
          status => {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Remote store error {status}: {body}"));
          }
        },
        Err(e) => {
          warn!(method, path, error = %e, attempt, "Request failed");
          last_error = Some(e.into());
          continue;
        }
      }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Max retries exceeded")))
  }

  /// Check if the remote store is reachable.
  pub async fn health_check(&self, probe_path: &str) -> bool {
    self.get(probe_path).await.is_ok()
  }
}
