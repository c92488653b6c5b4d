//! Shared world state for task pipeline BDD scenarios.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gantry::{
    artifact::{adapters::memory::InMemoryArtifactStore, domain::Artifact},
    compute::adapters::function::FnCompute,
    consumer::LoopSummary,
    pipeline::{Outcome, TaskPipeline, TaskRunner},
    task::{adapters::memory::InMemoryStateStore, domain::TaskId},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Public base URL of the scenario object store.
pub const BASE_URL: &str = "https://host";

/// Pipeline type used by the BDD world.
pub type ScenarioPipeline =
    TaskPipeline<InMemoryStateStore, InMemoryArtifactStore, FnCompute, DefaultClock>;

/// Task runner that remembers every outcome it returns.
pub struct RecordingRunner {
    pipeline: ScenarioPipeline,
    outcomes: Mutex<Vec<Outcome>>,
}

impl RecordingRunner {
    /// Wraps a pipeline.
    #[must_use]
    pub fn new(pipeline: ScenarioPipeline) -> Self {
        Self {
            pipeline,
            outcomes: Mutex::new(Vec::new()),
        }
    }

    /// Returns the outcomes recorded so far.
    ///
    /// # Errors
    ///
    /// Returns an error if the outcome log lock is poisoned.
    pub fn outcomes(&self) -> Result<Vec<Outcome>, eyre::Report> {
        self.outcomes
            .lock()
            .map(|outcomes| outcomes.clone())
            .map_err(|err| eyre::eyre!("outcome log poisoned: {err}"))
    }
}

#[async_trait]
impl TaskRunner for RecordingRunner {
    async fn run(&self, task_id: &TaskId) -> Outcome {
        let outcome = self.pipeline.run(task_id).await;
        if let Ok(mut outcomes) = self.outcomes.lock() {
            outcomes.push(outcome);
        }
        outcome
    }
}

/// Scenario world for task pipeline behaviour tests.
pub struct PipelineWorld {
    pub state: InMemoryStateStore,
    pub artifacts: InMemoryArtifactStore,
    pub runner: Arc<RecordingRunner>,
    pub seeded: HashMap<String, Vec<u8>>,
    pub last_summary: Option<LoopSummary>,
}

impl PipelineWorld {
    /// Creates a world with empty stores and a compute step that tags its
    /// input.
    #[must_use]
    pub fn new() -> Self {
        let state = InMemoryStateStore::new();
        let artifacts = InMemoryArtifactStore::new(BASE_URL);
        let pipeline = TaskPipeline::new(
            Arc::new(state.clone()),
            Arc::new(artifacts.clone()),
            Arc::new(FnCompute::new(|input| {
                Ok(Artifact::new(result_bytes(input)))
            })),
            Arc::new(DefaultClock),
        );

        Self {
            state,
            artifacts,
            runner: Arc::new(RecordingRunner::new(pipeline)),
            seeded: HashMap::new(),
            last_summary: None,
        }
    }
}

impl Default for PipelineWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Bytes the scenario compute step produces for `input`.
#[must_use]
pub fn result_bytes(input: &str) -> Vec<u8> {
    format!("result-of:{input}").into_bytes()
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> PipelineWorld {
    PipelineWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
