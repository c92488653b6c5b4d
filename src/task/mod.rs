//! Task record lifecycle for the gantry worker.
//!
//! A task record is created by an external producer in the `Processing`
//! state, read once by the pipeline when its identifier arrives on the
//! message stream, and written back once with its result locator. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;
