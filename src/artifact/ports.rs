//! Object store port for publishing result artifacts.

use super::domain::{Artifact, Locator, ObjectName};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for artifact store operations.
pub type ArtifactStoreResult<T> = Result<T, ArtifactStoreError>;

/// Object storage contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Stores `artifact` under `object_name`, replacing any existing object,
    /// and returns its retrieval locator.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactStoreError`] when the upload fails or is rejected.
    async fn put(
        &self,
        object_name: &ObjectName,
        artifact: &Artifact,
    ) -> ArtifactStoreResult<Locator>;
}

/// Errors returned by artifact store implementations.
#[derive(Debug, Clone, Error)]
pub enum ArtifactStoreError {
    /// The store answered but refused the object.
    #[error("upload of {object_name} rejected with status {status}")]
    Rejected {
        /// Object that was refused.
        object_name: ObjectName,
        /// Status code returned by the store.
        status: u16,
    },

    /// Network, authentication or quota failure.
    #[error("object store error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl ArtifactStoreError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
