//! Bounded-concurrency batch execution with per-item retry.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use dharma_scraper::{retry_with_backoff, RetryPolicy};
use futures::future::join_all;

/// Runs `processor` over `items` in chunks of `batch_size`.
///
/// Items within a chunk run concurrently, each under its own `retry` policy.
/// A chunk finishes completely before the next one starts, and `batch_delay`
/// is slept between chunks (not after the last).
///
/// Returns one result per item in input order. An item's final error is
/// returned in its slot and never affects the other items.
pub async fn process_batch<'a, T, R, E, F, Fut>(
    items: &'a [T],
    batch_size: usize,
    batch_delay: Duration,
    retry: &RetryPolicy,
    processor: F,
) -> Vec<Result<R, E>>
where
    E: Display,
    F: Fn(&'a T) -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    let batch_size = batch_size.max(1);
    let batch_count = items.len().div_ceil(batch_size);
    let mut results = Vec::with_capacity(items.len());

    for (index, chunk) in items.chunks(batch_size).enumerate() {
        tracing::debug!(
            batch = index + 1,
            batch_count,
            items = chunk.len(),
            "processing batch"
        );

        let outcomes = join_all(
            chunk
                .iter()
                .map(|item| retry_with_backoff(retry, || processor(item))),
        )
        .await;
        results.extend(outcomes);

        if index + 1 < batch_count && !batch_delay.is_zero() {
            tokio::time::sleep(batch_delay).await;
        }
    }

    results
}
