//! Consumes task messages and runs the processing pipeline for each one.
//!
//! Usage:
//!
//! ```text
//! task_worker <config-path>
//! ```
//!
//! The JSON document at `config-path` must deserialize into a
//! [`WorkerConfig`]. A representative configuration is:
//!
//! ```json
//! {
//!   "stream": {
//!     "brokers": ["127.0.0.1:9092"],
//!     "topic": "gan",
//!     "group_id": "gantry",
//!     "sentinel": "commit"
//!   },
//!   "state": {
//!     "nodes": ["redis://127.0.0.1:6380", "redis://127.0.0.1:6381"],
//!     "namespace": "test"
//!   },
//!   "artifacts": {
//!     "upload_url": "https://storage.example.com/upload/results",
//!     "public_base_url": "https://storage.example.com/results",
//!     "bearer_token": null,
//!     "timeout_secs": 30
//!   },
//!   "compute": {
//!     "endpoint": "http://127.0.0.1:8000/infer",
//!     "timeout_secs": 120
//!   },
//!   "pipeline": { "persist_failures": false },
//!   "logging": { "level": "info", "json": false, "directory": "logs" }
//! }
//! ```
//!
//! The worker stops when the stream closes or on Ctrl-C. A pipeline run that
//! has already started is allowed to finish first.

use camino::Utf8PathBuf;
use gantry::{
    artifact::{
        adapters::http::{HttpArtifactStore, HttpArtifactStoreSettings},
        ports::ArtifactStoreError,
    },
    compute::{adapters::http::HttpCompute, ports::ComputeError},
    config::{ConfigError, WorkerConfig},
    consumer::{
        ConsumerLoop, LoopSummary, MessageSourceError, ShutdownTrigger,
        adapters::kafka::KafkaMessageSource, shutdown_channel,
    },
    pipeline::TaskPipeline,
    task::{adapters::redis::RedisStateStore, ports::StateStoreError},
    telemetry,
};
use mockable::DefaultClock;
use std::env;
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::{error, info};

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that stop the worker before or while it starts consuming.
#[derive(Debug, Error)]
enum WorkerError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] std::io::Error),
    #[error("state store unavailable: {0}")]
    StateStore(#[source] StateStoreError),
    #[error("artifact store unavailable: {0}")]
    ArtifactStore(#[source] ArtifactStoreError),
    #[error("compute unavailable: {0}")]
    Compute(#[source] ComputeError),
    #[error("message source unavailable: {0}")]
    MessageSource(#[source] MessageSourceError),
}

fn main() -> Result<(), BoxError> {
    let config_path = parse_args(collect_args()?.into_iter())?;
    let config = WorkerConfig::load(&config_path).map_err(WorkerError::from)?;
    let _log_guard = telemetry::init(&config.logging);
    let runtime = build_runtime()?;
    let summary = runtime.block_on(run_worker(&config))?;
    info!(
        received = summary.received,
        dispatched = summary.dispatched,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "worker stopped"
    );
    Ok(())
}

fn collect_args() -> Result<Vec<Utf8PathBuf>, WorkerError> {
    env::args_os()
        .map(|arg_os| {
            let arg = arg_os
                .into_string()
                .map_err(|_| WorkerError::InvalidArgs("argument is not valid UTF-8".into()))?;
            Ok(Utf8PathBuf::from(arg))
        })
        .collect()
}

fn parse_args(mut args: impl Iterator<Item = Utf8PathBuf>) -> Result<Utf8PathBuf, WorkerError> {
    let _program = args.next();
    let config_path = args
        .next()
        .ok_or_else(|| WorkerError::InvalidArgs("missing config path argument".into()))?;
    if let Some(extra) = args.next() {
        let extra_arg = extra.as_str();
        return Err(WorkerError::InvalidArgs(format!(
            "unexpected extra argument: {extra_arg}"
        )));
    }
    Ok(config_path)
}

fn build_runtime() -> Result<tokio::runtime::Runtime, WorkerError> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(WorkerError::RuntimeInit)
}

async fn run_worker(config: &WorkerConfig) -> Result<LoopSummary, WorkerError> {
    let state_store = RedisStateStore::connect(&config.state.nodes, config.state.namespace.clone())
        .await
        .map_err(WorkerError::StateStore)?;
    let artifact_store = HttpArtifactStore::new(HttpArtifactStoreSettings {
        upload_url: config.artifacts.upload_url.clone(),
        public_base_url: config.artifacts.public_base_url.clone(),
        bearer_token: config.artifacts.bearer_token.clone(),
        timeout: config.artifacts.timeout(),
    })
    .map_err(WorkerError::ArtifactStore)?;
    let compute = HttpCompute::new(config.compute.endpoint.clone(), config.compute.timeout())
        .map_err(WorkerError::Compute)?;
    let pipeline = TaskPipeline::new(
        Arc::new(state_store),
        Arc::new(artifact_store),
        Arc::new(compute),
        Arc::new(DefaultClock),
    )
    .with_options(config.pipeline_options());

    let source = KafkaMessageSource::connect(
        &config.stream.brokers,
        &config.stream.group_id,
        &config.stream.topic,
    )
    .map_err(WorkerError::MessageSource)?;

    let (trigger, signal) = shutdown_channel();
    tokio::spawn(trigger_on_ctrl_c(trigger));

    info!(
        topic = %config.stream.topic,
        group_id = %config.stream.group_id,
        namespace = %config.state.namespace,
        "worker started"
    );
    Ok(ConsumerLoop::new(source, Arc::new(pipeline), signal)
        .with_sentinel(config.stream.sentinel.clone())
        .run()
        .await)
}

async fn trigger_on_ctrl_c(trigger: ShutdownTrigger) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "ctrl-c handler unavailable");
        return;
    }
    info!("ctrl-c received, finishing current task");
    trigger.trigger();
}
