//! Artifact payloads, object names and retrieval locators.

use crate::task::domain::TaskId;
use std::fmt;

/// Binary output of the compute step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    bytes: Vec<u8>,
    content_type: String,
}

impl Artifact {
    /// Media type assumed when the producer does not supply one.
    pub const DEFAULT_CONTENT_TYPE: &'static str = "image/png";

    /// Creates an artifact with the default content type.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: Self::DEFAULT_CONTENT_TYPE.to_owned(),
        }
    }

    /// Sets the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Returns the payload bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the content type.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Returns the payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` when the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Name of a stored object, `{task_id}_res`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectName(String);

impl ObjectName {
    /// Derives the result object name for a task.
    #[must_use]
    pub fn for_task(task_id: &TaskId) -> Self {
        Self(format!("{task_id}_res"))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Externally resolvable URI of a stored artifact, `{base_url}/{object_name}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator(String);

impl Locator {
    /// Builds the locator for an object under `base_url`.
    #[must_use]
    pub fn new(base_url: &str, object_name: &ObjectName) -> Self {
        let base = base_url.trim_end_matches('/');
        Self(format!("{base}/{object_name}"))
    }

    /// Returns the locator as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the locator, returning the URI string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
