//! Pipeline orchestration for a single task.

use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use super::{Outcome, TaskRunner};
use crate::artifact::{
    domain::{Artifact, ObjectName},
    ports::ArtifactStore,
};
use crate::compute::ports::{Compute, ComputeError};
use crate::task::{
    domain::{TaskId, TaskRecord},
    ports::StateStore,
};

/// Tunables for [`TaskPipeline`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    compute_timeout: Option<Duration>,
    persist_failures: bool,
}

impl PipelineOptions {
    /// Creates options with no compute timeout and no failure persistence.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            compute_timeout: None,
            persist_failures: false,
        }
    }

    /// Bounds the compute step; a run that exceeds it ends in
    /// [`Outcome::ComputeFailure`].
    #[must_use]
    pub const fn with_compute_timeout(mut self, timeout: Duration) -> Self {
        self.compute_timeout = Some(timeout);
        self
    }

    /// Writes a `Failed` status back after a compute or upload failure.
    ///
    /// The write is best effort and never changes the run's outcome.
    #[must_use]
    pub const fn with_persist_failures(mut self, persist: bool) -> Self {
        self.persist_failures = persist;
        self
    }

    /// Returns the compute timeout, if any.
    #[must_use]
    pub const fn compute_timeout(&self) -> Option<Duration> {
        self.compute_timeout
    }

    /// Returns `true` when failed runs persist a `Failed` status.
    #[must_use]
    pub const fn persist_failures(&self) -> bool {
        self.persist_failures
    }
}

/// Runs fetch-state, compute, store-artifact and update-state for one task.
///
/// Stages run strictly in order and none is retried. A failing stage ends
/// the run; the stages after it never execute.
pub struct TaskPipeline<S, A, P, C>
where
    S: StateStore,
    A: ArtifactStore,
    P: Compute,
    C: Clock + Send + Sync,
{
    state_store: Arc<S>,
    artifact_store: Arc<A>,
    compute: Arc<P>,
    clock: Arc<C>,
    options: PipelineOptions,
}

impl<S, A, P, C> Clone for TaskPipeline<S, A, P, C>
where
    S: StateStore,
    A: ArtifactStore,
    P: Compute,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            state_store: Arc::clone(&self.state_store),
            artifact_store: Arc::clone(&self.artifact_store),
            compute: Arc::clone(&self.compute),
            clock: Arc::clone(&self.clock),
            options: self.options,
        }
    }
}

impl<S, A, P, C> TaskPipeline<S, A, P, C>
where
    S: StateStore,
    A: ArtifactStore,
    P: Compute,
    C: Clock + Send + Sync,
{
    /// Creates a pipeline over the given collaborators.
    #[must_use]
    pub const fn new(
        state_store: Arc<S>,
        artifact_store: Arc<A>,
        compute: Arc<P>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            state_store,
            artifact_store,
            compute,
            clock,
            options: PipelineOptions::new(),
        }
    }

    /// Replaces the pipeline options.
    #[must_use]
    pub const fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the active options.
    #[must_use]
    pub const fn options(&self) -> PipelineOptions {
        self.options
    }

    /// Processes one task and reports how the run ended.
    pub async fn run(&self, task_id: &TaskId) -> Outcome {
        let started_at = self.clock.utc();
        let outcome = self.process(task_id).await;
        let elapsed_ms = (self.clock.utc() - started_at).num_milliseconds();
        info!(
            task_id = %task_id,
            outcome = %outcome,
            code = outcome.code(),
            elapsed_ms,
            "pipeline run finished"
        );
        outcome
    }

    async fn process(&self, task_id: &TaskId) -> Outcome {
        let mut record = match self.state_store.get(task_id).await {
            Ok(record) => record,
            Err(err) => {
                error!(task_id = %task_id, error = %err, "get state failed");
                return Outcome::ReadFailure;
            }
        };
        info!(
            task_id = %task_id,
            status = %record.status(),
            input_url = record.input_locator(),
            "get state"
        );

        if !record.can_complete() {
            error!(
                task_id = %task_id,
                status = %record.status(),
                "task record cannot be completed"
            );
            return Outcome::InvalidState;
        }

        let artifact = match self.compute_artifact(record.input_locator()).await {
            Ok(artifact) => artifact,
            Err(err) => {
                error!(task_id = %task_id, error = %err, "compute failed");
                self.persist_failure(&mut record).await;
                return Outcome::ComputeFailure;
            }
        };

        let object_name = ObjectName::for_task(record.task_id());
        let locator = match self.artifact_store.put(&object_name, &artifact).await {
            Ok(locator) => locator,
            Err(err) => {
                error!(
                    task_id = %task_id,
                    object_name = %object_name,
                    error = %err,
                    "upload failed"
                );
                self.persist_failure(&mut record).await;
                return Outcome::WriteArtifactFailure;
            }
        };
        info!(
            task_id = %task_id,
            object_name = %object_name,
            bytes = artifact.len(),
            "upload"
        );

        if let Err(err) = record.complete(locator.into_string()) {
            error!(task_id = %task_id, error = %err, "task record rejected completion");
            return Outcome::InvalidState;
        }
        info!(
            task_id = %task_id,
            status = %record.status(),
            output_url = record.output_locator(),
            "meta to update"
        );

        if let Err(err) = self.state_store.set(task_id, &record).await {
            error!(task_id = %task_id, error = %err, "update state failed");
            return Outcome::WriteStateFailure;
        }
        info!(task_id = %task_id, "done task");
        Outcome::Success
    }

    async fn compute_artifact(&self, input_locator: &str) -> Result<Artifact, ComputeError> {
        let Some(limit) = self.options.compute_timeout else {
            return self.compute.compute(input_locator).await;
        };
        tokio::time::timeout(limit, self.compute.compute(input_locator))
            .await
            .map_err(|_elapsed| ComputeError::TimedOut(limit))?
    }

    async fn persist_failure(&self, record: &mut TaskRecord) {
        if !self.options.persist_failures {
            return;
        }
        if let Err(err) = record.fail() {
            warn!(
                task_id = %record.task_id(),
                error = %err,
                "failed status not persisted"
            );
            return;
        }
        if let Err(err) = self.state_store.set(record.task_id(), record).await {
            error!(
                task_id = %record.task_id(),
                error = %err,
                "persisting failed status failed"
            );
        }
    }
}

#[async_trait]
impl<S, A, P, C> TaskRunner for TaskPipeline<S, A, P, C>
where
    S: StateStore,
    A: ArtifactStore,
    P: Compute,
    C: Clock + Send + Sync,
{
    async fn run(&self, task_id: &TaskId) -> Outcome {
        Self::run(self, task_id).await
    }
}
