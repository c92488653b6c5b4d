//! Port contracts for task state persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by the pipeline.

pub mod state_store;

pub use state_store::{StateStore, StateStoreError, StateStoreResult, decode_stored};

#[cfg(test)]
pub use state_store::MockStateStore;
