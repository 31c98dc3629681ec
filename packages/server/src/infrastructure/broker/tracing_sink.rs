//! Log-only broker transport, used when no broker is configured.

use async_trait::async_trait;

use crate::domain::{BrokerError, BrokerMessage, BrokerTransport};

pub struct TracingTransport {
    topic: String,
}

impl TracingTransport {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
        }
    }
}

#[async_trait]
impl BrokerTransport for TracingTransport {
    async fn send_batch(&self, batch: &[BrokerMessage]) -> Result<(), BrokerError> {
        for message in batch {
            tracing::debug!(
                topic = %self.topic,
                key = %message.key,
                "broker record: {}",
                message.payload
            );
        }
        Ok(())
    }
}
