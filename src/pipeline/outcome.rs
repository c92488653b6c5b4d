//! Outcome codes returned by a pipeline run.

use std::fmt;

/// Result of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The artifact was stored and the record updated.
    Success,
    /// The record could not be loaded: missing, malformed or unreachable.
    ReadFailure,
    /// The updated record could not be written back.
    WriteStateFailure,
    /// The artifact could not be uploaded.
    WriteArtifactFailure,
    /// The compute step failed or timed out.
    ComputeFailure,
    /// The stored record is in a state that cannot be completed.
    InvalidState,
}

impl Outcome {
    /// Returns the numeric outcome code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::ReadFailure => 1,
            Self::WriteStateFailure => 2,
            Self::WriteArtifactFailure => 3,
            Self::ComputeFailure => 4,
            Self::InvalidState => 5,
        }
    }

    /// Returns `true` for [`Outcome::Success`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns the canonical snake-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::ReadFailure => "read_failure",
            Self::WriteStateFailure => "write_state_failure",
            Self::WriteArtifactFailure => "write_artifact_failure",
            Self::ComputeFailure => "compute_failure",
            Self::InvalidState => "invalid_state",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
