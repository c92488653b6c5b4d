//! Compute port.

use crate::artifact::domain::Artifact;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Black-box transformation of source data into a result artifact.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Compute: Send + Sync {
    /// Produces the artifact for the data at `input_locator`.
    ///
    /// # Errors
    ///
    /// Returns [`ComputeError`] when the computation fails, times out or
    /// yields unusable output.
    async fn compute(&self, input_locator: &str) -> Result<Artifact, ComputeError>;
}

/// Errors returned by compute implementations.
#[derive(Debug, Clone, Error)]
pub enum ComputeError {
    /// The computation reported a failure.
    #[error("compute failed: {0}")]
    Failed(String),

    /// The computation did not finish in time.
    #[error("compute timed out after {0:?}")]
    TimedOut(Duration),

    /// The computation finished but produced no usable artifact.
    #[error("compute produced invalid output: {0}")]
    InvalidOutput(String),

    /// The compute service could not be reached.
    #[error("compute transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl ComputeError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
