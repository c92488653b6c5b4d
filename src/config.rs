//! Worker configuration loaded from a JSON file.
//!
//! A minimal file only names the artifact and compute endpoints; every other
//! section falls back to local defaults:
//!
//! ```json
//! {
//!   "artifacts": {
//!     "upload_url": "https://storage.example.com/upload/results",
//!     "public_base_url": "https://storage.example.com/results"
//!   },
//!   "compute": { "endpoint": "http://127.0.0.1:8000/infer" }
//! }
//! ```

use crate::consumer::COMMIT_KEY;
use crate::pipeline::PipelineOptions;
use crate::task::domain::RecordKey;
use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be opened or read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Path that was requested.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid configuration document.
    #[error("failed to parse config: {0}")]
    Parse(#[source] serde_json::Error),

    /// A value is present but unusable.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete worker configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkerConfig {
    /// Message stream settings.
    #[serde(default)]
    pub stream: StreamConfig,
    /// Task state store settings.
    #[serde(default)]
    pub state: StateConfig,
    /// Object store settings.
    pub artifacts: ArtifactConfig,
    /// Compute endpoint settings.
    pub compute: ComputeConfig,
    /// Pipeline behaviour.
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WorkerConfig {
    /// Reads, parses and validates the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, is not valid
    /// JSON for this schema, or fails validation.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let contents = read_config_file(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Parses and validates a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed documents and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(contents).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values serde cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_entries("stream.brokers", &self.stream.brokers)?;
        require_value("stream.topic", &self.stream.topic)?;
        require_value("stream.group_id", &self.stream.group_id)?;
        require_value("stream.sentinel", &self.stream.sentinel)?;
        require_entries("state.nodes", &self.state.nodes)?;
        require_value("state.namespace", &self.state.namespace)?;
        require_value("artifacts.upload_url", &self.artifacts.upload_url)?;
        require_value("artifacts.public_base_url", &self.artifacts.public_base_url)?;
        require_value("compute.endpoint", &self.compute.endpoint)?;
        if self.artifacts.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "artifacts.timeout_secs must be positive".to_owned(),
            ));
        }
        if self.compute.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "compute.timeout_secs must be positive".to_owned(),
            ));
        }
        Ok(())
    }

    /// Returns the pipeline options described by this configuration.
    #[must_use]
    pub fn pipeline_options(&self) -> PipelineOptions {
        let options = PipelineOptions::new().with_persist_failures(self.pipeline.persist_failures);
        self.compute
            .timeout()
            .map_or(options, |timeout| options.with_compute_timeout(timeout))
    }
}

/// Message stream settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StreamConfig {
    /// Bootstrap brokers as `host:port`.
    pub brokers: Vec<String>,
    /// Topic carrying task messages.
    pub topic: String,
    /// Consumer group identifier.
    pub group_id: String,
    /// Key marking messages to process.
    pub sentinel: String,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            brokers: vec!["127.0.0.1:9092".to_owned()],
            topic: "gan".to_owned(),
            group_id: "gantry".to_owned(),
            sentinel: COMMIT_KEY.to_owned(),
        }
    }
}

/// Task state store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StateConfig {
    /// Cluster startup nodes as `redis://host:port` URLs.
    pub nodes: Vec<String>,
    /// Key namespace prefixed to task identifiers.
    pub namespace: String,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            nodes: (6380..=6386)
                .map(|port| format!("redis://127.0.0.1:{port}"))
                .collect(),
            namespace: RecordKey::DEFAULT_NAMESPACE.to_owned(),
        }
    }
}

/// Object store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactConfig {
    /// URL objects are uploaded under; the object name is appended.
    pub upload_url: String,
    /// Public URL objects are served from; the object name is appended.
    pub public_base_url: String,
    /// Bearer token sent with uploads.
    #[serde(default)]
    pub bearer_token: Option<String>,
    /// Upper bound on one upload, in seconds.
    #[serde(default = "default_upload_timeout_secs")]
    pub timeout_secs: u64,
}

impl ArtifactConfig {
    /// Returns the per-upload timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Compute endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComputeConfig {
    /// Inference endpoint receiving the input locator.
    pub endpoint: String,
    /// Upper bound on one computation, in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ComputeConfig {
    /// Returns the computation timeout, if configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Pipeline behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Writes a `Failed` status after compute or upload failures.
    pub persist_failures: bool,
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Emits JSON lines instead of human-readable text.
    pub json: bool,
    /// Directory for daily log files; logs go to stdout when unset.
    pub directory: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
            directory: None,
        }
    }
}

const fn default_upload_timeout_secs() -> u64 {
    30
}

fn require_value(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_entries(field: &str, values: &[String]) -> Result<(), ConfigError> {
    if values.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must not be empty")));
    }
    values
        .iter()
        .try_for_each(|value| require_value(field, value))
}

fn read_config_file(path: &Utf8Path) -> std::io::Result<String> {
    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "config path has no file name",
        )
    })?;
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read_to_string(file_name)
}
