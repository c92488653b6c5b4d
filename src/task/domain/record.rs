//! Task record aggregate and its storage codec.

use super::{MalformedRecord, TaskDomainError, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted state of one unit of work.
///
/// Field order and wire names are fixed for compatibility with the record
/// producer: `task_id`, `user_id`, `create_time`, `proc_status`, `input_url`,
/// `output_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    task_id: TaskId,
    user_id: String,
    create_time: i64,
    proc_status: TaskStatus,
    #[serde(rename = "input_url")]
    input_locator: String,
    #[serde(rename = "output_url")]
    output_locator: String,
}

impl TaskRecord {
    /// Creates a record in the initial `Processing` state with no output.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        user_id: impl Into<String>,
        create_time: i64,
        input_locator: impl Into<String>,
    ) -> Self {
        Self {
            task_id,
            user_id: user_id.into(),
            create_time,
            proc_status: TaskStatus::Processing,
            input_locator: input_locator.into(),
            output_locator: String::new(),
        }
    }

    /// Decodes and validates a stored payload.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRecord::Decode`] when a field is missing or has the
    /// wrong type, and [`MalformedRecord::OutputMismatch`] when the output
    /// locator disagrees with the status.
    pub fn decode(payload: &[u8]) -> Result<Self, MalformedRecord> {
        let record: Self = serde_json::from_slice(payload).map_err(MalformedRecord::Decode)?;
        record.validate()?;
        Ok(record)
    }

    /// Encodes the record as a flat JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRecord::OutputMismatch`] when the record violates
    /// the output invariant, or [`MalformedRecord::Encode`] when
    /// serialization fails.
    pub fn encode(&self) -> Result<Vec<u8>, MalformedRecord> {
        self.validate()?;
        serde_json::to_vec(self).map_err(MalformedRecord::Encode)
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Returns the owning user reference.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Returns the raw creation timestamp in Unix seconds.
    #[must_use]
    pub const fn create_time(&self) -> i64 {
        self.create_time
    }

    /// Returns the creation timestamp, if it is representable.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.create_time, 0)
    }

    /// Returns the processing status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.proc_status
    }

    /// Returns the source data locator.
    #[must_use]
    pub fn input_locator(&self) -> &str {
        &self.input_locator
    }

    /// Returns the result artifact locator; empty until the task succeeds.
    #[must_use]
    pub fn output_locator(&self) -> &str {
        &self.output_locator
    }

    /// Returns `true` when [`TaskRecord::complete`] would be accepted.
    #[must_use]
    pub const fn can_complete(&self) -> bool {
        matches!(
            self.proc_status,
            TaskStatus::Processing | TaskStatus::Succeeded
        )
    }

    /// Marks the task as succeeded with the given artifact locator.
    ///
    /// A record that already succeeded keeps its status and takes the new
    /// locator, so a redelivered task overwrites its previous result.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyOutputLocator`] for an empty locator
    /// and [`TaskDomainError::InvalidStateTransition`] from `Failed`.
    pub fn complete(&mut self, output_locator: impl Into<String>) -> Result<(), TaskDomainError> {
        let locator = output_locator.into();
        if locator.is_empty() {
            return Err(TaskDomainError::EmptyOutputLocator(self.task_id.clone()));
        }
        if !self.can_complete() {
            return Err(self.rejected(TaskStatus::Succeeded));
        }
        self.output_locator = locator;
        self.proc_status = TaskStatus::Succeeded;
        Ok(())
    }

    /// Marks the task as failed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] when the record is
    /// already in a terminal state.
    pub fn fail(&mut self) -> Result<(), TaskDomainError> {
        if !self.proc_status.can_transition_to(TaskStatus::Failed) {
            return Err(self.rejected(TaskStatus::Failed));
        }
        self.proc_status = TaskStatus::Failed;
        Ok(())
    }

    fn rejected(&self, to: TaskStatus) -> TaskDomainError {
        TaskDomainError::InvalidStateTransition {
            task_id: self.task_id.clone(),
            from: self.proc_status,
            to,
        }
    }

    fn validate(&self) -> Result<(), MalformedRecord> {
        let has_output = !self.output_locator.is_empty();
        let succeeded = self.proc_status == TaskStatus::Succeeded;
        if has_output != succeeded {
            return Err(MalformedRecord::OutputMismatch {
                task_id: self.task_id.clone(),
                status: self.proc_status,
                output_locator: self.output_locator.clone(),
            });
        }
        Ok(())
    }
}
