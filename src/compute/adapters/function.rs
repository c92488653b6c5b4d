//! Closure-backed compute for embedding and tests.

use async_trait::async_trait;
use std::fmt;

use crate::artifact::domain::Artifact;
use crate::compute::ports::{Compute, ComputeError};

type ComputeFn = dyn Fn(&str) -> Result<Artifact, ComputeError> + Send + Sync;

/// Compute step implemented by a synchronous closure.
pub struct FnCompute {
    function: Box<ComputeFn>,
}

impl FnCompute {
    /// Wraps a closure.
    pub fn new(
        function: impl Fn(&str) -> Result<Artifact, ComputeError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            function: Box::new(function),
        }
    }

    /// Returns a compute step that yields `artifact` for every input.
    #[must_use]
    pub fn constant(artifact: Artifact) -> Self {
        Self::new(move |_| Ok(artifact.clone()))
    }

    /// Returns a compute step that fails every input with `message`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        let reason = message.into();
        Self::new(move |_| Err(ComputeError::Failed(reason.clone())))
    }
}

impl fmt::Debug for FnCompute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCompute").finish_non_exhaustive()
    }
}

#[async_trait]
impl Compute for FnCompute {
    async fn compute(&self, input_locator: &str) -> Result<Artifact, ComputeError> {
        (self.function)(input_locator)
    }
}
