// tests/retry_backoff.rs

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::anyhow;

use taskrelay::retry::retry;
use taskrelay_test_utils::init_tracing;

#[tokio::test]
async fn first_success_returns_immediately() {
    init_tracing();

    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);

    let result = retry(
        move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, anyhow::Error>("done")
            }
        },
        3,
        Duration::from_millis(20),
    )
    .await;

    assert_eq!(result.unwrap(), "done");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn fails_twice_then_succeeds_with_backoff() {
    init_tracing();

    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);
    let base = Duration::from_millis(20);

    let started = Instant::now();
    let result = retry(
        move || {
            let counter = Arc::clone(&counter);
            async move {
                let attempt = counter.fetch_add(1, Ordering::SeqCst);
                if attempt < 2 {
                    Err(anyhow!("transient failure {attempt}"))
                } else {
                    Ok("recovered".to_string())
                }
            }
        },
        3,
        base,
    )
    .await;
    let elapsed = started.elapsed();

    assert_eq!(result.unwrap(), "recovered");
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    // Total suspension should approximate base + 2 * base.
    assert!(
        elapsed >= base * 3,
        "expected at least {:?} of backoff, got {:?}",
        base * 3,
        elapsed
    );
}

#[tokio::test]
async fn exhaustion_propagates_last_failure_after_exact_attempts() {
    init_tracing();

    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);

    let result: anyhow::Result<()> = retry(
        move || {
            let counter = Arc::clone(&counter);
            async move {
                let attempt = counter.fetch_add(1, Ordering::SeqCst);
                Err(anyhow!("failure on attempt {attempt}"))
            }
        },
        3,
        Duration::from_millis(1),
    )
    .await;

    let err = result.unwrap_err();
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    // The *last* failure is the one propagated.
    assert!(err.to_string().contains("attempt 2"), "got: {err}");
}

#[tokio::test]
async fn zero_attempts_is_an_error_without_invoking_the_operation() {
    init_tracing();

    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);

    let result: anyhow::Result<()> = retry(
        move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        },
        0,
        Duration::from_millis(1),
    )
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn attempt_counts_beyond_the_exponent_range_do_not_panic() {
    init_tracing();

    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);

    // With a zero base delay the backoff sleeps are free, so exercising
    // exponents past 31 stays cheap.
    let result: anyhow::Result<()> = retry(
        move || {
            let counter = Arc::clone(&counter);
            async move {
                let attempt = counter.fetch_add(1, Ordering::SeqCst);
                Err(anyhow!("failure on attempt {attempt}"))
            }
        },
        40,
        Duration::ZERO,
    )
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 40);
}
