//! Error types for task domain validation and parsing.

use super::{TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating task records.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task identifier is empty or contains whitespace.
    #[error("invalid task identifier '{0}'")]
    InvalidTaskId(String),

    /// The output locator supplied on completion is empty.
    #[error("output locator for task {0} must not be empty")]
    EmptyOutputLocator(TaskId),

    /// The requested status transition is not permitted.
    #[error("invalid status transition for task {task_id}: {from} -> {to}")]
    InvalidStateTransition {
        /// Task whose transition was rejected.
        task_id: TaskId,
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// A stored task payload that cannot be turned into a valid record.
#[derive(Debug, Error)]
pub enum MalformedRecord {
    /// The payload is not a JSON object with every required field.
    #[error("task record payload could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),

    /// The record could not be serialized.
    #[error("task record could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),

    /// `output_url` is set without a `Succeeded` status, or missing with one.
    #[error("task {task_id} has status {status} but output locator '{output_locator}'")]
    OutputMismatch {
        /// Task carried by the payload.
        task_id: TaskId,
        /// Status carried by the payload.
        status: TaskStatus,
        /// Output locator carried by the payload.
        output_locator: String,
    },
}
