//! Adapter implementations for task state persistence.

pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;
