//! Consumer loop service.

use std::sync::Arc;
use tracing::{error, info, warn};

use super::{
    domain::{COMMIT_KEY, Dispatch, SkipReason},
    ports::MessageSource,
    shutdown::ShutdownSignal,
};
use crate::pipeline::{Outcome, TaskRunner};

/// Counters reported when the consumer loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    /// Messages read from the source.
    pub received: u64,
    /// Messages that started a pipeline run.
    pub dispatched: u64,
    /// Messages skipped without a run.
    pub skipped: u64,
    /// Runs that ended in [`Outcome::Success`].
    pub succeeded: u64,
    /// Runs that ended in any other outcome.
    pub failed: u64,
    /// Receive attempts that returned an error.
    pub receive_errors: u64,
}

impl LoopSummary {
    const fn record(&mut self, outcome: Outcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// Reads messages in order and runs the pipeline for each commit message.
pub struct ConsumerLoop<M, R>
where
    M: MessageSource,
    R: TaskRunner,
{
    source: M,
    runner: Arc<R>,
    shutdown: ShutdownSignal,
    sentinel: String,
}

impl<M, R> ConsumerLoop<M, R>
where
    M: MessageSource,
    R: TaskRunner,
{
    /// Creates a loop dispatching messages keyed [`COMMIT_KEY`].
    #[must_use]
    pub fn new(source: M, runner: Arc<R>, shutdown: ShutdownSignal) -> Self {
        Self {
            source,
            runner,
            shutdown,
            sentinel: COMMIT_KEY.to_owned(),
        }
    }

    /// Replaces the sentinel key.
    #[must_use]
    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    /// Runs until the source closes or shutdown is requested.
    ///
    /// Shutdown is observed between messages; a pipeline run that has started
    /// always completes.
    pub async fn run(mut self) -> LoopSummary {
        let mut summary = LoopSummary::default();
        loop {
            if self.shutdown.is_triggered() {
                info!("shutdown requested");
                break;
            }
            let received = tokio::select! {
                biased;
                () = self.shutdown.triggered() => {
                    info!("shutdown requested");
                    break;
                }
                next = self.source.recv() => next,
            };
            let message = match received {
                Ok(Some(message)) => message,
                Ok(None) => {
                    info!("message stream closed");
                    break;
                }
                Err(err) => {
                    summary.receive_errors += 1;
                    error!(error = %err, "receive failed");
                    continue;
                }
            };
            summary.received += 1;
            let key = message.key().map(String::from_utf8_lossy);
            let value = message.value().map(String::from_utf8_lossy);
            info!(key = ?key, value = ?value, "msg received");

            match message.classify(&self.sentinel) {
                Dispatch::Run(task_id) => {
                    summary.dispatched += 1;
                    let outcome = self.runner.run(&task_id).await;
                    summary.record(outcome);
                    info!(
                        task_id = %task_id,
                        outcome = %outcome,
                        code = outcome.code(),
                        "done msg"
                    );
                }
                Dispatch::Skipped(reason @ SkipReason::UnexpectedKey(_)) => {
                    summary.skipped += 1;
                    info!(reason = %reason, "invalid key, continue");
                }
                Dispatch::Skipped(reason) => {
                    summary.skipped += 1;
                    warn!(reason = %reason, "malformed msg skipped");
                }
            }
        }
        info!(
            received = summary.received,
            dispatched = summary.dispatched,
            skipped = summary.skipped,
            succeeded = summary.succeeded,
            failed = summary.failed,
            receive_errors = summary.receive_errors,
            "consumer loop stopped"
        );
        summary
    }
}
