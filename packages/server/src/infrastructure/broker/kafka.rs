//! Kafka broker transport backed by an rdkafka `FutureProducer`.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;
use rdkafka::{
    ClientConfig,
    producer::{FutureProducer, FutureRecord},
};

use crate::domain::{BrokerError, BrokerMessage, BrokerTransport};

/// How long a record may wait for space in the producer queue
const QUEUE_TIMEOUT: Duration = Duration::from_secs(5);

pub struct KafkaTransport {
    producer: FutureProducer,
    topic: String,
}

impl KafkaTransport {
    /// Create a producer for `brokers` (comma-separated `host:port` list).
    ///
    /// Batching happens in [`super::BatchingPublisher`], so the producer's own
    /// linger is kept short.
    pub fn new(brokers: &str, topic: impl Into<String>) -> Result<Self, BrokerError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .set("linger.ms", "5")
            .create()
            .map_err(|e| BrokerError::Transport(e.to_string()))?;
        let topic = topic.into();
        tracing::info!("Kafka producer created for {} (topic '{}')", brokers, topic);
        Ok(Self { producer, topic })
    }
}

#[async_trait]
impl BrokerTransport for KafkaTransport {
    async fn send_batch(&self, batch: &[BrokerMessage]) -> Result<(), BrokerError> {
        let deliveries = batch.iter().map(|message| {
            let record = FutureRecord::to(&self.topic)
                .key(message.key.as_str())
                .payload(message.payload.as_str());
            self.producer.send(record, QUEUE_TIMEOUT)
        });

        let failures: Vec<String> = join_all(deliveries)
            .await
            .into_iter()
            .filter_map(|result| result.err())
            .map(|(e, _message)| e.to_string())
            .collect();

        match failures.first() {
            None => Ok(()),
            Some(first) => Err(BrokerError::Transport(format!(
                "{} of {} record(s) failed: {}",
                failures.len(),
                batch.len(),
                first
            ))),
        }
    }
}
