//! In-process message source backed by a tokio channel.

use crate::consumer::{
    domain::StreamMessage,
    ports::{MessageSource, MessageSourceError},
};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Creates a bounded channel source and the sender that feeds it.
///
/// The source reports a closed stream once every sender is dropped and the
/// buffer is drained.
#[must_use]
pub fn channel(capacity: usize) -> (mpsc::Sender<StreamMessage>, ChannelMessageSource) {
    let (sender, receiver) = mpsc::channel(capacity);
    (sender, ChannelMessageSource { receiver })
}

/// Message source reading from an `mpsc` receiver.
#[derive(Debug)]
pub struct ChannelMessageSource {
    receiver: mpsc::Receiver<StreamMessage>,
}

impl ChannelMessageSource {
    /// Wraps an existing receiver.
    #[must_use]
    pub const fn new(receiver: mpsc::Receiver<StreamMessage>) -> Self {
        Self { receiver }
    }
}

#[async_trait]
impl MessageSource for ChannelMessageSource {
    async fn recv(&mut self) -> Result<Option<StreamMessage>, MessageSourceError> {
        Ok(self.receiver.recv().await)
    }
}
