//! Redis cluster state store.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::cluster::ClusterClient;
use redis::cluster_async::ClusterConnection;
use std::fmt;

use crate::task::{
    domain::{RecordKey, TaskId, TaskRecord},
    ports::state_store::ensure_same_task,
    ports::{StateStore, StateStoreError, StateStoreResult, decode_stored},
};

/// State store backed by a Redis cluster.
///
/// The cluster connection is multiplexed; each operation works on a cheap
/// clone of the shared handle.
#[derive(Clone)]
pub struct RedisStateStore {
    connection: ClusterConnection,
    namespace: String,
}

impl RedisStateStore {
    /// Connects to the cluster through the given startup nodes.
    ///
    /// Nodes use Redis URL syntax, for example `redis://127.0.0.1:6380`.
    ///
    /// # Errors
    ///
    /// Returns [`StateStoreError::Backend`] when the node list is invalid or
    /// the cluster cannot be reached.
    pub async fn connect(nodes: &[String], namespace: impl Into<String>) -> StateStoreResult<Self> {
        let client = ClusterClient::new(nodes.to_vec()).map_err(StateStoreError::backend)?;
        let connection = client
            .get_async_connection()
            .await
            .map_err(StateStoreError::backend)?;
        Ok(Self {
            connection,
            namespace: namespace.into(),
        })
    }

    fn key(&self, task_id: &TaskId) -> RecordKey {
        RecordKey::new(&self.namespace, task_id)
    }
}

impl fmt::Debug for RedisStateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStateStore")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl StateStore for RedisStateStore {
    async fn get(&self, task_id: &TaskId) -> StateStoreResult<TaskRecord> {
        let key = self.key(task_id);
        let mut connection = self.connection.clone();
        let payload: Option<Vec<u8>> = connection
            .get(key.as_str())
            .await
            .map_err(StateStoreError::backend)?;
        let bytes = payload.ok_or_else(|| StateStoreError::NotFound(task_id.clone()))?;
        decode_stored(task_id, &bytes)
    }

    async fn set(&self, task_id: &TaskId, record: &TaskRecord) -> StateStoreResult<()> {
        ensure_same_task(task_id, record)?;
        let payload = record
            .encode()
            .map_err(|err| StateStoreError::malformed(task_id, err))?;
        let key = self.key(task_id);
        let mut connection = self.connection.clone();
        connection
            .set::<_, _, ()>(key.as_str(), payload)
            .await
            .map_err(StateStoreError::backend)
    }
}
