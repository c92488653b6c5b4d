//! Port through which the consumer loop drives pipeline runs.

use super::Outcome;
use crate::task::domain::TaskId;
use async_trait::async_trait;

/// Runs the pipeline for one task.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRunner: Send + Sync {
    /// Processes `task_id` to completion and reports how it ended.
    async fn run(&self, task_id: &TaskId) -> Outcome;
}
