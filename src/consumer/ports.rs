//! Message source port.

use super::domain::StreamMessage;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Ordered source of stream messages.
#[async_trait]
pub trait MessageSource: Send {
    /// Waits for the next message.
    ///
    /// Returns `Ok(None)` once the stream is closed and no further messages
    /// will arrive.
    ///
    /// # Errors
    ///
    /// Returns [`MessageSourceError`] when a message could not be received.
    /// The source stays usable after an error.
    async fn recv(&mut self) -> Result<Option<StreamMessage>, MessageSourceError>;
}

/// Errors returned by message sources.
#[derive(Debug, Clone, Error)]
pub enum MessageSourceError {
    /// Broker or transport failure.
    #[error("message source error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl MessageSourceError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
