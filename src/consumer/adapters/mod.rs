//! Message source adapters.

pub mod channel;
#[cfg(feature = "kafka")]
pub mod kafka;
