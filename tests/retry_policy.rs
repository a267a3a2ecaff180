// tests/retry_policy.rs

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ndkdrive::errors::DriveError;
use ndkdrive::exec::{MAX_ATTEMPTS, with_retry};

#[tokio::test]
async fn succeeds_first_try_without_retrying() {
    common::init_tracing();
    let attempts = Arc::new(AtomicUsize::new(0));

    let result = with_retry("op", MAX_ATTEMPTS, || {
        let attempts = Arc::clone(&attempts);
        async move {
            attempts.fetch_add(1, Ordering::Relaxed);
            Ok(42)
        }
    })
    .await;

    assert_eq!(result.unwrap(), 42);
    assert_eq!(attempts.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn transient_failures_retry_until_success() {
    common::init_tracing();
    let attempts = Arc::new(AtomicUsize::new(0));

    let result = with_retry("op", MAX_ATTEMPTS, || {
        let attempts = Arc::clone(&attempts);
        async move {
            let n = attempts.fetch_add(1, Ordering::Relaxed) + 1;
            if n < MAX_ATTEMPTS {
                Err(DriveError::TransientInfra("mkdir race".to_string()))
            } else {
                Ok(())
            }
        }
    })
    .await;

    assert!(result.is_ok());
    assert_eq!(attempts.load(Ordering::Relaxed), MAX_ATTEMPTS);
}

#[tokio::test]
async fn persistent_transient_failure_escalates_after_the_bound() {
    common::init_tracing();
    let attempts = Arc::new(AtomicUsize::new(0));

    let result: Result<(), _> = with_retry("build of project 't1'", MAX_ATTEMPTS, || {
        let attempts = Arc::clone(&attempts);
        async move {
            attempts.fetch_add(1, Ordering::Relaxed);
            Err(DriveError::TransientInfra("mkdir race".to_string()))
        }
    })
    .await;

    assert_eq!(attempts.load(Ordering::Relaxed), MAX_ATTEMPTS);
    match result {
        Err(DriveError::RetriesExhausted { what, attempts }) => {
            assert_eq!(what, "build of project 't1'");
            assert_eq!(attempts, MAX_ATTEMPTS);
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
}

#[tokio::test]
async fn non_transient_failure_propagates_immediately() {
    common::init_tracing();
    let attempts = Arc::new(AtomicUsize::new(0));

    let result: Result<(), _> = with_retry("op", MAX_ATTEMPTS, || {
        let attempts = Arc::clone(&attempts);
        async move {
            attempts.fetch_add(1, Ordering::Relaxed);
            Err(DriveError::CommandFailed("'make' failed".to_string()))
        }
    })
    .await;

    assert_eq!(attempts.load(Ordering::Relaxed), 1);
    assert!(matches!(result, Err(DriveError::CommandFailed(_))));
}
