//! Single-task pipeline: fetch state, compute, store artifact, update state.
//!
//! Every stage failure is converted into a distinct [`Outcome`]; nothing
//! raised by a store or the compute step crosses the pipeline boundary.

pub mod outcome;
pub mod ports;
pub mod service;

pub use outcome::Outcome;
pub use ports::TaskRunner;
pub use service::{PipelineOptions, TaskPipeline};

#[cfg(test)]
pub use ports::MockTaskRunner;
