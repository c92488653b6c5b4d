//! Kafka message source.

use crate::consumer::{
    domain::StreamMessage,
    ports::{MessageSource, MessageSourceError},
};
use async_trait::async_trait;
use rdkafka::{
    ClientConfig, Message,
    consumer::{Consumer, StreamConsumer},
};
use std::fmt;

/// Topic the task producer publishes to.
pub const DEFAULT_TOPIC: &str = "gan";

/// Message source subscribed to a single Kafka topic.
///
/// Offsets are committed automatically by the client, so a message is
/// acknowledged independently of its pipeline outcome.
pub struct KafkaMessageSource {
    consumer: StreamConsumer,
    topic: String,
}

impl KafkaMessageSource {
    /// Creates a consumer in `group_id` and subscribes it to `topic`.
    ///
    /// # Errors
    ///
    /// Returns [`MessageSourceError`] when the client cannot be created or
    /// the subscription is refused.
    pub fn connect(
        brokers: &[String],
        group_id: &str,
        topic: &str,
    ) -> Result<Self, MessageSourceError> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", brokers.join(","))
            .set("group.id", group_id)
            .set("enable.auto.commit", "true")
            .create()
            .map_err(MessageSourceError::backend)?;
        consumer
            .subscribe(&[topic])
            .map_err(MessageSourceError::backend)?;
        Ok(Self {
            consumer,
            topic: topic.to_owned(),
        })
    }

    /// Returns the subscribed topic.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl fmt::Debug for KafkaMessageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KafkaMessageSource")
            .field("topic", &self.topic)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MessageSource for KafkaMessageSource {
    async fn recv(&mut self) -> Result<Option<StreamMessage>, MessageSourceError> {
        let message = self
            .consumer
            .recv()
            .await
            .map_err(MessageSourceError::backend)?;
        Ok(Some(StreamMessage::from_parts(
            message.key().map(<[u8]>::to_vec),
            message.payload().map(<[u8]>::to_vec),
        )))
    }
}
