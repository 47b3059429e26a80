use crate::error::{CoreError, NetworkError};
use crate::traits::Clock;
use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry policy for rate-limited requests.
///
/// Only HTTP 429 rejections are retried, with a fixed delay between attempts.
/// Every other failure propagates on first occurrence.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            delay_ms: 2000,
        }
    }
}

impl RetryConfig {
    pub fn new(max_attempts: u32, delay_ms: u64) -> Self {
        Self {
            max_attempts,
            delay_ms,
        }
    }
}

/// Runs `operation` until it succeeds, fails with a non-rate-limit error, or
/// the rate-limit budget is spent.
///
/// This is the only retry mechanism in the system; callers must not wrap it
/// in retry loops of their own.
pub async fn with_rate_limit_retry<T, F, Fut>(
    config: RetryConfig,
    clock: &dyn Clock,
    operation_name: &str,
    operation: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    while attempt < config.max_attempts {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!(
                        "{} succeeded after {} rate-limited attempts",
                        operation_name, attempt
                    );
                }
                return Ok(result);
            }
            Err(e) if is_rate_limited(&e) => {
                attempt += 1;
                warn!(
                    "{} rate limited (attempt {}/{}), retrying in {}ms",
                    operation_name, attempt, config.max_attempts, config.delay_ms
                );
                clock.sleep(Duration::from_millis(config.delay_ms)).await;
            }
            Err(e) => return Err(e),
        }
    }

    Err(CoreError::from(NetworkError::RetryBudgetExhausted {
        operation: operation_name.to_string(),
        attempts: config.max_attempts,
    })
    .into())
}

/// True when the error chain bottoms out in an HTTP 429 rejection.
pub fn is_rate_limited(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<CoreError>(),
            Some(CoreError::Network(NetworkError::RateLimited { .. }))
        ) || matches!(
            cause.downcast_ref::<NetworkError>(),
            Some(NetworkError::RateLimited { .. })
        )
    })
}
