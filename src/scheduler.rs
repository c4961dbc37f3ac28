//! Perpetual iteration scheduler
//!
//! Drives one iteration at a time and reschedules the next after a fixed
//! delay regardless of how the previous one ended. Retry-forever without
//! backoff is deliberate for an always-on agent: there is no cap, no
//! suppression of repeated failures, and no terminal state short of process
//! exit. Iterations never overlap because the delay only starts once the
//! current iteration (including its error handling) has completed.

use crate::submit::SubmissionResult;
use crate::Error;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How one iteration ended
#[derive(Debug)]
pub enum IterationOutcome {
    /// A swap was submitted and included
    Traded(SubmissionResult),
    /// The iteration decided not to trade (no window, empty vault, dry run)
    Skipped,
    /// The iteration failed; classified and logged, never fatal
    Failed(Error),
}

/// Loop driver with a fixed inter-iteration delay
pub struct Scheduler {
    interval: Duration,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Run iterations forever
    ///
    /// The iteration function is infallible at this boundary: errors arrive
    /// already wrapped in its `IterationOutcome`.
    pub async fn run<F, Fut>(&self, mut iteration: F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = IterationOutcome>,
    {
        loop {
            let outcome = iteration().await;
            log_outcome(&outcome);

            debug!(
                delay_secs = self.interval.as_secs(),
                "scheduling next iteration"
            );
            tokio::time::sleep(self.interval).await;
        }
    }
}

/// Classify and log an iteration's outcome
fn log_outcome(outcome: &IterationOutcome) {
    match outcome {
        IterationOutcome::Traded(result) => info!(
            transaction_hash = %result.transaction_hash,
            gas_used = result.gas_used,
            "iteration traded"
        ),
        IterationOutcome::Skipped => info!("iteration skipped without trading"),
        IterationOutcome::Failed(error) => match error {
            Error::Route(msg) => warn!(%msg, "no viable route, skipping iteration"),
            Error::Simulation(msg) => warn!(%msg, "dry-run validation reverted"),
            Error::Submission(msg) => warn!(%msg, "transaction submission failed"),
            Error::Subgraph(msg) => warn!(%msg, "subgraph read failed"),
            other => warn!(error = %other, "iteration failed"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::B256;
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    fn outcomes() -> Vec<IterationOutcome> {
        vec![
            IterationOutcome::Traded(SubmissionResult {
                transaction_hash: B256::ZERO,
                gas_used: 21_000,
            }),
            IterationOutcome::Skipped,
            IterationOutcome::Failed(Error::Route("no pool".to_string())),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn reschedules_once_per_iteration_for_every_outcome() {
        let spans: Arc<Mutex<Vec<(Instant, Instant)>>> = Arc::new(Mutex::new(Vec::new()));
        let spans_in_loop = Arc::clone(&spans);

        let handle = tokio::spawn(async move {
            let mut pending = outcomes();
            pending.reverse();
            let scheduler = Scheduler::new(Duration::from_secs(60));
            scheduler
                .run(move || {
                    let spans = Arc::clone(&spans_in_loop);
                    let outcome = pending.pop().unwrap_or(IterationOutcome::Skipped);
                    async move {
                        let started = Instant::now();
                        // Simulate iteration work spanning real time
                        tokio::time::sleep(Duration::from_secs(5)).await;
                        spans.lock().unwrap().push((started, Instant::now()));
                        outcome
                    }
                })
                .await;
        });

        // Three full iterations: 3 * (5s work + 60s delay)
        tokio::time::sleep(Duration::from_secs(200)).await;
        handle.abort();

        let spans = spans.lock().unwrap();
        // Success, skip, and failure each got exactly one reschedule
        assert!(spans.len() >= 3, "expected 3+ iterations, got {}", spans.len());
        for window in spans.windows(2) {
            let (_, prev_end) = window[0];
            let (next_start, _) = window[1];
            // Next iteration starts only after the previous one plus the delay
            assert!(next_start >= prev_end + Duration::from_secs(60));
        }
    }
}
