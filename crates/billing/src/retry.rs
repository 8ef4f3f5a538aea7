//! Bounded retry for idempotent provider reads

use std::future::Future;
use std::time::Duration;

use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;

/// Upper bound on any single backoff sleep
const MAX_BACKOFF: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one
    pub max_retries: usize,
    /// Delay before the first retry; doubles on each subsequent one
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 100,
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay_ms: 0,
        }
    }

    /// Backoff delays: base, 2*base, 4*base, ... with jitter, capped at 5s
    fn strategy(&self) -> impl Iterator<Item = Duration> {
        // ExponentialBackoff yields factor * 2^n, so halve the base to start at it
        let factor = (self.base_delay_ms / 2).max(1);
        ExponentialBackoff::from_millis(2)
            .factor(factor)
            .max_delay(MAX_BACKOFF)
            .map(jitter)
            .take(self.max_retries)
    }

    /// Run `action`, retrying while `is_transient` says the error is worth it
    pub async fn run<T, E, F, Fut>(
        &self,
        operation: &'static str,
        action: F,
        is_transient: fn(&E) -> bool,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        RetryIf::start(self.strategy(), action, |err: &E| {
            let transient = is_transient(err);
            if transient {
                tracing::warn!(operation, error = %err, "Transient provider failure");
            }
            transient
        })
        .await
    }
}
