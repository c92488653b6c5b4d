//! State store port for reading and writing task records by identifier.

use crate::task::domain::{MalformedRecord, TaskId, TaskRecord};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for state store operations.
pub type StateStoreResult<T> = Result<T, StateStoreError>;

/// Key-value persistence contract for task records.
///
/// Writes are unconditional last-writer-wins overwrites; no coordination
/// between a `get` and a later `set` of the same key is provided.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Loads the record stored under `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StateStoreError::NotFound`] when no record exists,
    /// [`StateStoreError::Malformed`] or [`StateStoreError::KeyMismatch`] when
    /// the stored payload is unusable, and [`StateStoreError::Backend`] when
    /// the store cannot be reached.
    async fn get(&self, task_id: &TaskId) -> StateStoreResult<TaskRecord>;

    /// Overwrites the record stored under `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StateStoreError::KeyMismatch`] when the record belongs to a
    /// different task and [`StateStoreError::Backend`] when the write fails.
    async fn set(&self, task_id: &TaskId, record: &TaskRecord) -> StateStoreResult<()>;
}

/// Errors returned by state store implementations.
#[derive(Debug, Clone, Error)]
pub enum StateStoreError {
    /// No record is stored for the task.
    #[error("task record not found: {0}")]
    NotFound(TaskId),

    /// The stored payload is not a valid task record.
    #[error("malformed task record for {task_id}: {source}")]
    Malformed {
        /// Task whose payload was rejected.
        task_id: TaskId,
        /// Codec failure.
        source: Arc<MalformedRecord>,
    },

    /// The record stored under a key names another task.
    #[error("record stored for task {requested} belongs to task {stored}")]
    KeyMismatch {
        /// Task that was looked up or written.
        requested: TaskId,
        /// Task carried by the record.
        stored: TaskId,
    },

    /// Backend connectivity or command failure.
    #[error("state backend error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl StateStoreError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }

    /// Wraps a codec error for the given task.
    #[must_use]
    pub fn malformed(task_id: &TaskId, err: MalformedRecord) -> Self {
        Self::Malformed {
            task_id: task_id.clone(),
            source: Arc::new(err),
        }
    }
}

/// Decodes a stored payload and checks it belongs to the requested task.
///
/// Shared by adapters so that every backend applies the same validation.
///
/// # Errors
///
/// Returns [`StateStoreError::Malformed`] or [`StateStoreError::KeyMismatch`].
pub fn decode_stored(requested: &TaskId, payload: &[u8]) -> StateStoreResult<TaskRecord> {
    let record =
        TaskRecord::decode(payload).map_err(|err| StateStoreError::malformed(requested, err))?;
    ensure_same_task(requested, &record)?;
    Ok(record)
}

/// Checks that `record` is keyed by `requested`.
///
/// # Errors
///
/// Returns [`StateStoreError::KeyMismatch`] when the identifiers differ.
pub(crate) fn ensure_same_task(requested: &TaskId, record: &TaskRecord) -> StateStoreResult<()> {
    if record.task_id() != requested {
        return Err(StateStoreError::KeyMismatch {
            requested: requested.clone(),
            stored: record.task_id().clone(),
        });
    }
    Ok(())
}
