//! Request throttling for the provider clients.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Rate limit parameters for one provider.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window.
    pub max_requests: u32,
    /// Window duration.
    pub window: Duration,
    /// Number of automatic retries after a throttled response.
    pub max_retries: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 60,
            window: Duration::from_secs(60),
            max_retries: 3,
        }
    }
}

/// Sliding-window rate limiter shared by clones of a client.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    /// Timestamps of requests inside the current window.
    requests: Arc<Mutex<VecDeque<Instant>>>,
    /// Lockout deadline after the provider reported throttling.
    locked_until: Arc<Mutex<Option<Instant>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            requests: Arc::new(Mutex::new(VecDeque::new())),
            locked_until: Arc::new(Mutex::new(None)),
        }
    }

    /// Wait until a request may be sent, then record it.
    pub async fn acquire(&self) {
        loop {
            // Honor a provider-imposed lockout first.
            {
                let locked = self.locked_until.lock().await;
                if let Some(until) = *locked {
                    let now = Instant::now();
                    if now < until {
                        let wait = until - now;
                        drop(locked);
                        tokio::time::sleep(wait).await;
                        continue;
                    }
                }
            }

            let now = Instant::now();
            let mut requests = self.requests.lock().await;

            let cutoff = now - self.config.window;
            while requests.front().is_some_and(|t| *t < cutoff) {
                requests.pop_front();
            }

            if requests.len() as u32 >= self.config.max_requests {
                if let Some(oldest) = requests.front() {
                    let wait_until = *oldest + self.config.window;
                    if wait_until > now {
                        let wait = wait_until - now;
                        drop(requests);
                        tracing::debug!("window full, throttling for {:?}", wait);
                        tokio::time::sleep(wait).await;
                        continue;
                    }
                }
            }

            requests.push_back(now);
            return;
        }
    }

    /// Record a throttled response from the provider.
    pub async fn lockout(&self, retry_after_ms: Option<u64>) {
        let wait = retry_after_ms
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_secs(1));
        let mut locked = self.locked_until.lock().await;
        *locked = Some(Instant::now() + wait);
    }

    /// Clear a lockout once a retry is about to run.
    pub async fn clear_lockout(&self) {
        let mut locked = self.locked_until.lock().await;
        *locked = None;
    }

    /// Requests recorded in the current window.
    pub async fn request_count(&self) -> usize {
        let now = Instant::now();
        let cutoff = now - self.config.window;
        let mut requests = self.requests.lock().await;
        while requests.front().is_some_and(|t| *t < cutoff) {
            requests.pop_front();
        }
        requests.len()
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }
}

impl Clone for RateLimiter {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            requests: Arc::clone(&self.requests),
            locked_until: Arc::clone(&self.locked_until),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_acquire_records_requests() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 10,
            window: Duration::from_secs(10),
            max_retries: 0,
        });

        for _ in 0..5 {
            limiter.acquire().await;
        }
        assert_eq!(limiter.request_count().await, 5);
    }

    #[tokio::test]
    async fn test_clones_share_the_window() {
        let limiter = RateLimiter::new(RateLimitConfig::default());
        let other = limiter.clone();

        limiter.acquire().await;
        other.acquire().await;

        assert_eq!(limiter.request_count().await, 2);
    }
}
