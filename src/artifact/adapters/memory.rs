//! In-memory artifact store for pipeline tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::artifact::{
    domain::{Artifact, Locator, ObjectName},
    ports::{ArtifactStore, ArtifactStoreError, ArtifactStoreResult},
};

/// Thread-safe in-memory object store with overwrite semantics.
#[derive(Debug, Clone)]
pub struct InMemoryArtifactStore {
    base_url: String,
    objects: Arc<RwLock<HashMap<ObjectName, Artifact>>>,
    puts: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl InMemoryArtifactStore {
    /// Creates an empty store whose locators are rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: Arc::default(),
            puts: Arc::default(),
            failing: Arc::default(),
        }
    }

    /// Returns the artifact stored under `object_name`.
    #[must_use]
    pub fn get(&self, object_name: &ObjectName) -> Option<Artifact> {
        self.objects
            .read()
            .ok()
            .and_then(|objects| objects.get(object_name).cloned())
    }

    /// Returns the number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.read().map(|objects| objects.len()).unwrap_or(0)
    }

    /// Returns `true` if no objects are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of successful uploads, overwrites included.
    #[must_use]
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Makes subsequent uploads fail with a backend error.
    pub fn fail_uploads(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn put(
        &self,
        object_name: &ObjectName,
        artifact: &Artifact,
    ) -> ArtifactStoreResult<Locator> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ArtifactStoreError::backend(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                format!("object store unavailable for {object_name}"),
            )));
        }
        let mut objects = self.objects.write().map_err(|err| {
            ArtifactStoreError::backend(std::io::Error::other(err.to_string()))
        })?;
        objects.insert(object_name.clone(), artifact.clone());
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(Locator::new(&self.base_url, object_name))
    }
}
