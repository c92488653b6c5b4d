//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use gantry::{
    artifact::{adapters::memory::InMemoryArtifactStore, domain::Artifact},
    compute::{adapters::function::FnCompute, ports::ComputeError},
    pipeline::TaskPipeline,
    task::{
        adapters::memory::InMemoryStateStore,
        domain::{TaskId, TaskRecord},
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Public base URL used by the in-memory object store.
pub const BASE_URL: &str = "https://storage.test/results";

/// Pipeline type wired to in-memory adapters.
pub type MemoryPipeline =
    TaskPipeline<InMemoryStateStore, InMemoryArtifactStore, FnCompute, DefaultClock>;

/// In-memory stores shared between a test and its pipeline.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Task state store.
    pub state: InMemoryStateStore,
    /// Object store.
    pub artifacts: InMemoryArtifactStore,
}

impl Stores {
    /// Builds a pipeline over these stores.
    #[must_use]
    pub fn pipeline(&self, compute: FnCompute) -> MemoryPipeline {
        TaskPipeline::new(
            Arc::new(self.state.clone()),
            Arc::new(self.artifacts.clone()),
            Arc::new(compute),
            Arc::new(DefaultClock),
        )
    }

    /// Seeds a `Processing` record for `task_id` with the given input.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is invalid or the record cannot be
    /// stored.
    pub fn seed_processing(&self, task_id: &str, input: &str) -> Result<TaskId, eyre::Report> {
        let id = TaskId::new(task_id)?;
        self.state
            .seed(&TaskRecord::new(id.clone(), "user-1", 1_700_000_000, input))?;
        Ok(id)
    }
}

/// Provides fresh in-memory stores for each test.
#[fixture]
pub fn stores() -> Stores {
    Stores {
        state: InMemoryStateStore::new(),
        artifacts: InMemoryArtifactStore::new(BASE_URL),
    }
}

/// Compute step that renders the input locator into the artifact bytes.
#[must_use]
pub fn render_compute() -> FnCompute {
    FnCompute::new(|input| {
        if input.is_empty() {
            return Err(ComputeError::InvalidOutput("empty input".to_owned()));
        }
        Ok(Artifact::new(format!("rendered:{input}").into_bytes()))
    })
}
