//! Adapter implementations for artifact storage.

pub mod http;
pub mod memory;
