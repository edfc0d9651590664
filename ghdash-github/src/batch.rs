//! Bounded parallel fan-out over many repositories

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::Result;

/// Run `task` for every input, `batch_size` at a time
///
/// Batches run sequentially with `delay` between them; tasks inside a batch
/// run concurrently. A failed task is logged and contributes nothing, so one
/// inaccessible repository never sinks the whole listing. Output keeps input
/// order.
pub async fn run_batched<I, T, F, Fut>(
    inputs: Vec<I>,
    batch_size: usize,
    delay: Duration,
    task: F,
) -> Vec<T>
where
    I: Display,
    F: Fn(&I) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let batch_size = batch_size.max(1);
    let batches = inputs.len().div_ceil(batch_size);
    let mut output = Vec::new();

    for (index, chunk) in inputs.chunks(batch_size).enumerate() {
        debug!(batch = index + 1, of = batches, size = chunk.len(), "Running batch");

        let results = join_all(chunk.iter().map(&task)).await;
        for (input, result) in chunk.iter().zip(results) {
            match result {
                Ok(items) => output.extend(items),
                Err(e) => warn!(target_name = %input, error = %e, "Batch task failed, skipping"),
            }
        }

        if index + 1 < batches && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    output
}
