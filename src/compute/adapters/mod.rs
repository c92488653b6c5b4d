//! Adapter implementations for the compute step.

pub mod function;
pub mod http;
