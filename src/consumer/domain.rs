//! Stream messages and their classification.

use crate::task::domain::{TaskDomainError, TaskId};
use std::fmt;

/// Key marking a message whose value names a task to process.
pub const COMMIT_KEY: &str = "commit";

/// One message read from the stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamMessage {
    key: Option<Vec<u8>>,
    value: Option<Vec<u8>>,
}

impl StreamMessage {
    /// Creates a message with both a key and a value.
    #[must_use]
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: Some(key.into()),
            value: Some(value.into()),
        }
    }

    /// Creates a message from optional raw parts, as delivered by the broker.
    #[must_use]
    pub const fn from_parts(key: Option<Vec<u8>>, value: Option<Vec<u8>>) -> Self {
        Self { key, value }
    }

    /// Returns the raw key, if present.
    #[must_use]
    pub fn key(&self) -> Option<&[u8]> {
        self.key.as_deref()
    }

    /// Returns the raw value, if present.
    #[must_use]
    pub fn value(&self) -> Option<&[u8]> {
        self.value.as_deref()
    }

    /// Decides whether the message names a task to run.
    ///
    /// The key is checked first, so the value of a non-sentinel message is
    /// never decoded.
    #[must_use]
    pub fn classify(&self, sentinel: &str) -> Dispatch {
        let Some(raw_key) = self.key.as_deref() else {
            return Dispatch::Skipped(SkipReason::MissingKey);
        };
        let Ok(key) = std::str::from_utf8(raw_key) else {
            return Dispatch::Skipped(SkipReason::NonUtf8Key);
        };
        if key != sentinel {
            return Dispatch::Skipped(SkipReason::UnexpectedKey(key.to_owned()));
        }
        let Some(raw_value) = self.value.as_deref() else {
            return Dispatch::Skipped(SkipReason::MissingValue);
        };
        let Ok(value) = std::str::from_utf8(raw_value) else {
            return Dispatch::Skipped(SkipReason::NonUtf8Value);
        };
        match TaskId::new(value) {
            Ok(task_id) => Dispatch::Run(task_id),
            Err(err) => Dispatch::Skipped(SkipReason::InvalidTaskId(err)),
        }
    }
}

/// What the consumer loop does with a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Run the pipeline for the task.
    Run(TaskId),
    /// Log and move on.
    Skipped(SkipReason),
}

/// Why a message was not dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The message carries no key.
    MissingKey,
    /// The sentinel message carries no value.
    MissingValue,
    /// The key is not valid UTF-8.
    NonUtf8Key,
    /// The value is not valid UTF-8.
    NonUtf8Value,
    /// The key is not the sentinel.
    UnexpectedKey(String),
    /// The value is not a usable task identifier.
    InvalidTaskId(TaskDomainError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingKey => f.write_str("message has no key"),
            Self::MissingValue => f.write_str("message has no value"),
            Self::NonUtf8Key => f.write_str("message key is not UTF-8"),
            Self::NonUtf8Value => f.write_str("message value is not UTF-8"),
            Self::UnexpectedKey(key) => write!(f, "key '{key}' is not the sentinel"),
            Self::InvalidTaskId(err) => write!(f, "{err}"),
        }
    }
}
