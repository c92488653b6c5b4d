//! Result artifacts and the object store they are published to.
//!
//! Object names are derived from the task identifier, so re-running a task
//! overwrites its previous artifact instead of leaving an orphan behind.

pub mod adapters;
pub mod domain;
pub mod ports;
