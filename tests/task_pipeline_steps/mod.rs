//! Step definitions for task pipeline scenarios.

pub mod when;
pub mod world;
