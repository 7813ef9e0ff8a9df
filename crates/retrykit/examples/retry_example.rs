//! Example: running operations through the retry executor
//!
//! This example demonstrates:
//! 1. A flaky async call recovered by linear backoff
//! 2. A business-rule rejection that is never retried
//! 3. Cancelling a call while it waits between retries
//! 4. The blocking call shape
//!
//! Run with:
//! ```bash
//! RUST_LOG=debug cargo run -p retrykit --example retry_example
//! ```

use retrykit::prelude::*;
use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// A simulated API that fails the first few times
struct UnreliableApi {
    attempts: Arc<AtomicU32>,
    fail_count: u32,
}

impl UnreliableApi {
    fn new(fail_count: u32) -> Self {
        Self {
            attempts: Arc::new(AtomicU32::new(0)),
            fail_count,
        }
    }

    async fn call(&self) -> Result<String, std::io::Error> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(10)).await;

        if attempt < self.fail_count {
            println!("  Attempt {}: FAILED (simulating transient error)", attempt + 1);
            Err(std::io::Error::other(format!(
                "Transient error on attempt {}",
                attempt + 1
            )))
        } else {
            println!("  Attempt {}: SUCCESS", attempt + 1);
            Ok("API response data".to_string())
        }
    }

    fn total_attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

/// Example 1: flaky call recovered by linear backoff
async fn example_linear_backoff(executor: &RetryExecutor) -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 1: Linear Backoff ===\n");

    let api = UnreliableApi::new(2);
    let start = Instant::now();

    let result = executor
        .execute_async_with(|| api.call(), ExecuteOptions::new().name("api::call"))
        .await?;

    println!("\nResult: {}", result);
    println!("Total attempts: {}", api.total_attempts());
    println!("Total time: {:?}", start.elapsed());
    println!("Expected delays: 100ms + 200ms = ~300ms");

    Ok(())
}

/// Example 2: application errors end the call immediately
async fn example_application_error(executor: &RetryExecutor) -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 2: Application Error (Never Retried) ===\n");

    let attempts = AtomicU32::new(0);
    let result = executor
        .execute_action_async(|| {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(ApplicationError::new("order total exceeds credit limit")) }
        })
        .await;

    match result {
        Err(RetryError::Failed(err)) => println!("  Rejected: {}", err),
        other => println!("  Unexpected outcome: {:?}", other),
    }
    println!("Total attempts: {}", attempts.load(Ordering::SeqCst));

    Ok(())
}

/// Example 3: cancellation while waiting between retries
async fn example_cancellation(executor: &RetryExecutor) -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 3: Cancellation During Backoff ===\n");

    let token = CancellationToken::new();
    let canceller = {
        let token = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            println!("  Cancelling...");
            token.cancel();
        })
    };

    let api = UnreliableApi::new(u32::MAX);
    let start = Instant::now();
    let result = executor.execute_async_with(|| api.call(), &token).await;
    canceller.await?;

    match result {
        Err(err) if err.is_cancelled() => println!("  {} ({:?})", err, start.elapsed()),
        other => println!("  Unexpected outcome: {:?}", other),
    }

    Ok(())
}

/// Example 4: the blocking call shape, run off the async runtime
fn example_blocking(executor: &RetryExecutor) -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 4: Blocking Call ===\n");

    let mut remaining_failures = 1;
    let value = executor.execute(|| {
        if remaining_failures > 0 {
            remaining_failures -= 1;
            println!("  Blocking attempt failed");
            Err(std::io::Error::other("lock contention"))
        } else {
            println!("  Blocking attempt succeeded");
            Ok(42)
        }
    })?;

    println!("Result: {}", value);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("==============================================");
    println!("   retrykit: Retry Executor Examples");
    println!("==============================================");

    let executor = RetryExecutor::builder()
        .policy(LinearBackoff::new(4, Duration::from_millis(100)))
        .build();

    example_linear_backoff(&executor).await?;
    example_application_error(&executor).await?;
    example_cancellation(&executor).await?;

    let blocking = executor.clone();
    tokio::task::spawn_blocking(move || example_blocking(&blocking).map_err(|e| e.to_string()))
        .await??;

    println!("\n==============================================");
    println!("   All examples completed successfully!");
    println!("==============================================\n");

    Ok(())
}
