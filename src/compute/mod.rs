//! External compute step that turns an input locator into a result artifact.
//!
//! The computation itself is opaque to the worker; this module only defines
//! the port and the adapters used to reach it.

pub mod adapters;
pub mod ports;
