//! Backend client wrapper with exponential backoff retry
//!
//! Only reads are retried. `POST /commands` is not idempotent (an `fp+` that
//! timed out may still have been applied), so commands go through once.

use async_trait::async_trait;
use rand::Rng;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use fatebot_shared::{CommandPayload, CommandRequest, GameSnapshot};

use crate::infrastructure::ports::{BackendError, BackendPort};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (0 = no retries, just the initial attempt)
    pub max_retries: u32,
    /// Base delay in milliseconds before first retry
    pub base_delay_ms: u64,
    /// Maximum delay in milliseconds (caps exponential growth)
    pub max_delay_ms: u64,
    /// Jitter factor (0.0-1.0) applied around each delay
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 200,
            max_delay_ms: 2000,
            jitter_factor: 0.2,
        }
    }
}

/// Wrapper that retries backend reads
pub struct ResilientBackend {
    inner: Arc<dyn BackendPort>,
    config: RetryConfig,
}

impl ResilientBackend {
    pub fn new(inner: Arc<dyn BackendPort>, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    /// Delay before retry `attempt` (1-based): base * 2^(attempt-1), capped, with jitter
    fn calculate_delay(&self, attempt: u32) -> u64 {
        let base = self.config.base_delay_ms;
        let exponential = base.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
        let capped = exponential.min(self.config.max_delay_ms);

        let jitter_range = (capped as f64 * self.config.jitter_factor) as i64;
        if jitter_range > 0 {
            let jitter = rand::thread_rng().gen_range(-jitter_range..=jitter_range);
            (capped as i64 + jitter).max(0) as u64
        } else {
            capped
        }
    }

    async fn execute_with_retry<T, F, Fut>(
        &self,
        operation_name: &str,
        operation: F,
    ) -> Result<T, BackendError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, BackendError>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::info!(
                            attempt = attempt + 1,
                            operation = operation_name,
                            "Backend request succeeded after retry"
                        );
                    }
                    return Ok(value);
                }
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = self.calculate_delay(attempt);
                    tracing::warn!(
                        attempt,
                        max_retries = self.config.max_retries,
                        delay_ms = delay,
                        error = %e,
                        operation = operation_name,
                        "Backend request failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                Err(e) => {
                    tracing::error!(
                        attempts = attempt + 1,
                        error = %e,
                        operation = operation_name,
                        "Backend request failed"
                    );
                    return Err(e);
                }
            }
        }
    }
}

#[async_trait]
impl BackendPort for ResilientBackend {
    async fn game(&self) -> Result<GameSnapshot, BackendError> {
        let inner = Arc::clone(&self.inner);
        self.execute_with_retry("game", || {
            let inner = Arc::clone(&inner);
            async move { inner.game().await }
        })
        .await
    }

    async fn command(&self, request: CommandRequest) -> Result<CommandPayload, BackendError> {
        self.inner.command(request).await
    }
}
