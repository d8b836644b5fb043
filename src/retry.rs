// src/retry.rs

//! Generic retry-with-exponential-backoff wrapper.
//!
//! `retry` wraps any fallible async operation. Between attempt `i` and
//! `i + 1` (0-indexed) it sleeps `base_delay * 2^i`. The first success wins;
//! exhaustion propagates the last failure.
//!
//! The wrapper has no side effects of its own, so callers retrying writes
//! must make sure the wrapped operation is idempotent.

use std::future::Future;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::time::sleep;
use tracing::{debug, warn};

/// Invoke `operation` up to `attempts` times with exponential backoff.
pub async fn retry<T, F, Fut>(
    mut operation: F,
    attempts: u32,
    base_delay: Duration,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    if attempts == 0 {
        return Err(anyhow!("retry called with zero attempts"));
    }

    let mut last_err = None;

    for attempt in 0..attempts {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(attempt, "operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => {
                warn!(attempt, error = %format!("{err:#}"), "operation attempt failed");
                last_err = Some(err);

                // No point sleeping after the final attempt.
                if attempt + 1 < attempts {
                    // Saturate so large attempt counts cap the delay
                    // instead of overflowing the multiplier.
                    let delay = base_delay.saturating_mul(2u32.saturating_pow(attempt));
                    debug!(?delay, "backing off before next attempt");
                    sleep(delay).await;
                }
            }
        }
    }

    // attempts > 0, so at least one error was recorded.
    Err(last_err.unwrap_or_else(|| anyhow!("retry exhausted without recording an error")))
}
