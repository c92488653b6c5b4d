//! Stream consumer loop that turns commit messages into pipeline runs.
//!
//! Messages are handled one at a time in stream order. A message is only
//! dispatched when its key equals the sentinel; everything else is logged and
//! skipped. No pipeline outcome stops the loop.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
pub mod shutdown;

pub use domain::{COMMIT_KEY, Dispatch, SkipReason, StreamMessage};
pub use ports::{MessageSource, MessageSourceError};
pub use services::{ConsumerLoop, LoopSummary};
pub use shutdown::{ShutdownSignal, ShutdownTrigger, shutdown_channel};

#[cfg(test)]
mod tests;
