//! Gantry: single-consumer task processing worker.
//!
//! The worker reads task identifiers from a message stream, loads each task's
//! state from a key-value store, runs an opaque compute step on the task's
//! input, publishes the result to an object store, and writes the result
//! locator back into the task's state.
//!
//! # Architecture
//!
//! Gantry follows hexagonal architecture principles:
//!
//! - **Domain**: Task records, statuses and artifacts with no infrastructure
//!   dependencies
//! - **Ports**: Abstract trait interfaces for the state store, object store,
//!   compute step and message source
//! - **Adapters**: Concrete implementations of ports (in-memory, Redis, HTTP,
//!   Kafka)
//!
//! # Modules
//!
//! - [`task`]: Task records, their wire codec and the state store port
//! - [`artifact`]: Result artifacts and the object store port
//! - [`compute`]: The compute port and its adapters
//! - [`pipeline`]: Per-task orchestration and outcome codes
//! - [`consumer`]: The stream consumer loop
//! - [`config`]: Worker configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod artifact;
pub mod compute;
pub mod config;
pub mod consumer;
pub mod pipeline;
pub mod task;
pub mod telemetry;

#[cfg(test)]
mod test_http;
