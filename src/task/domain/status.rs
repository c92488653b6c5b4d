//! Processing status of a task record.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task processing status.
///
/// Persisted as the integer codes used by the record producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum TaskStatus {
    /// Task is waiting for, or undergoing, processing.
    Processing,
    /// Task finished and its artifact is available.
    Succeeded,
    /// Task could not be completed.
    Failed,
}

impl TaskStatus {
    /// Returns the persisted integer code.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Processing => 1,
            Self::Succeeded => 2,
            Self::Failed => 10,
        }
    }

    /// Returns the canonical lower-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    /// Returns `true` for states with no outgoing transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Returns `true` when moving from `self` to `target` is a forward
    /// transition.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Processing, Self::Succeeded | Self::Failed)
        )
    }
}

impl TryFrom<i64> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Processing),
            2 => Ok(Self::Succeeded),
            10 => Ok(Self::Failed),
            other => Err(ParseTaskStatusError(other.to_string())),
        }
    }
}

impl From<TaskStatus> for i64 {
    fn from(value: TaskStatus) -> Self {
        value.code()
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "processing" => Ok(Self::Processing),
            "succeeded" => Ok(Self::Succeeded),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
