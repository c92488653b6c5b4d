//! In-memory state store for pipeline tests and local runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{RecordKey, TaskId, TaskRecord},
    ports::{StateStore, StateStoreError, StateStoreResult, decode_stored},
    ports::state_store::ensure_same_task,
};

/// Thread-safe in-memory state store.
///
/// Records are kept as encoded payloads under their namespaced key, so reads
/// go through the same codec as a networked backend.
#[derive(Debug, Clone)]
pub struct InMemoryStateStore {
    namespace: String,
    entries: Arc<RwLock<HashMap<RecordKey, Vec<u8>>>>,
    writes: Arc<AtomicUsize>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryStateStore {
    /// Creates an empty store using the default key namespace.
    #[must_use]
    pub fn new() -> Self {
        Self::with_namespace(RecordKey::DEFAULT_NAMESPACE)
    }

    /// Creates an empty store using the given key namespace.
    #[must_use]
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            entries: Arc::default(),
            writes: Arc::default(),
            fail_reads: Arc::default(),
            fail_writes: Arc::default(),
        }
    }

    /// Stores a record directly, as the external record producer would.
    ///
    /// Seeding does not count towards [`InMemoryStateStore::write_count`].
    ///
    /// # Errors
    ///
    /// Returns [`StateStoreError::Malformed`] when the record cannot be
    /// encoded.
    pub fn seed(&self, record: &TaskRecord) -> StateStoreResult<()> {
        let payload = record
            .encode()
            .map_err(|err| StateStoreError::malformed(record.task_id(), err))?;
        self.insert_raw(record.task_id(), payload)
    }

    /// Stores an arbitrary payload under the task's key.
    ///
    /// # Errors
    ///
    /// Returns [`StateStoreError::Backend`] when the lock is poisoned.
    pub fn insert_raw(&self, task_id: &TaskId, payload: impl Into<Vec<u8>>) -> StateStoreResult<()> {
        let mut entries = self.entries.write().map_err(|err| {
            StateStoreError::backend(std::io::Error::other(err.to_string()))
        })?;
        entries.insert(self.key(task_id), payload.into());
        Ok(())
    }

    /// Returns the payload stored under the task's key.
    #[must_use]
    pub fn raw(&self, task_id: &TaskId) -> Option<Vec<u8>> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(&self.key(task_id)).cloned())
    }

    /// Returns the number of successful [`StateStore::set`] calls.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Makes subsequent reads fail with a backend error.
    pub fn fail_reads(&self, failing: bool) {
        self.fail_reads.store(failing, Ordering::SeqCst);
    }

    /// Makes subsequent writes fail with a backend error.
    pub fn fail_writes(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }

    fn key(&self, task_id: &TaskId) -> RecordKey {
        RecordKey::new(&self.namespace, task_id)
    }
}

impl Default for InMemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

fn unavailable(operation: &str) -> StateStoreError {
    StateStoreError::backend(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        format!("state store unavailable for {operation}"),
    ))
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn get(&self, task_id: &TaskId) -> StateStoreResult<TaskRecord> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(unavailable("get"));
        }
        let entries = self.entries.read().map_err(|err| {
            StateStoreError::backend(std::io::Error::other(err.to_string()))
        })?;
        let payload = entries
            .get(&self.key(task_id))
            .ok_or_else(|| StateStoreError::NotFound(task_id.clone()))?;
        decode_stored(task_id, payload)
    }

    async fn set(&self, task_id: &TaskId, record: &TaskRecord) -> StateStoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(unavailable("set"));
        }
        ensure_same_task(task_id, record)?;
        let payload = record
            .encode()
            .map_err(|err| StateStoreError::malformed(task_id, err))?;
        self.insert_raw(task_id, payload)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
