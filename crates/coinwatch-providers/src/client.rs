//! Shared HTTP client for the REST providers.

use reqwest::{Client, Response};
use std::time::Duration;

use crate::error::{ProviderError, Result};
use crate::rate_limit::{RateLimitConfig, RateLimiter};

/// Thin wrapper around `reqwest::Client` with throttling and uniform
/// response handling. Both providers used here are public endpoints, so no
/// request signing is involved.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: Client,
    base_url: String,
    limiter: RateLimiter,
}

impl RestClient {
    /// Create a client for the given base URL.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
        limit: RateLimitConfig,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            limiter: RateLimiter::new(limit),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a JSON document, retrying on throttled responses up to the
    /// configured retry budget.
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let max_retries = self.limiter.config().max_retries;
        let mut retries = 0;

        loop {
            self.limiter.acquire().await;

            let response = self.http.get(&url).query(query).send().await?;

            match Self::decode_response(response).await {
                Ok(value) => return Ok(value),
                Err(ProviderError::RateLimited { retry_after_ms }) => {
                    if retries >= max_retries {
                        return Err(ProviderError::RateLimited { retry_after_ms });
                    }
                    retries += 1;
                    tracing::warn!(
                        url = %url,
                        retry = retries,
                        "provider throttled request, backing off"
                    );
                    self.limiter.lockout(retry_after_ms).await;
                    let wait = retry_after_ms.unwrap_or(1000) * u64::from(retries);
                    tokio::time::sleep(Duration::from_millis(wait)).await;
                    self.limiter.clear_lockout().await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Map an HTTP response to a decoded value or a tagged error.
    async fn decode_response<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .map(|s: u64| s * 1000);

            return Err(ProviderError::RateLimited {
                retry_after_ms: retry_after,
            });
        }

        let body = response.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("failed to parse provider response: {}", body);
            ProviderError::Json(e)
        })
    }
}
