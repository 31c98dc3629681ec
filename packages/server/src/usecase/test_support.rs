//! Test doubles shared by the use case tests.

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::domain::{
    BrokerError, BrokerMessage, ConnectionId, MessageBroker, MessagePusher, PublishReceipt,
};

/// Broker that keeps every published message in memory
#[derive(Default)]
pub(crate) struct RecordingBroker {
    published: Mutex<Vec<BrokerMessage>>,
    closed: bool,
}

impl RecordingBroker {
    /// A broker whose publisher has already stopped
    pub(crate) fn closed() -> Self {
        Self {
            published: Mutex::new(Vec::new()),
            closed: true,
        }
    }

    pub(crate) fn published(&self) -> Vec<BrokerMessage> {
        self.published.lock().clone()
    }
}

impl MessageBroker for RecordingBroker {
    fn publish(&self, message: BrokerMessage) -> Result<PublishReceipt, BrokerError> {
        if self.closed {
            return Err(BrokerError::Closed);
        }
        self.published.lock().push(message);
        Ok(PublishReceipt::ready(Ok(())))
    }
}

/// Register `n` viewers and return their outbound receivers
pub(crate) async fn register_viewers(
    pusher: &dyn MessagePusher,
    n: usize,
) -> Vec<(ConnectionId, mpsc::Receiver<String>)> {
    let mut viewers = Vec::with_capacity(n);
    for _ in 0..n {
        let (tx, rx) = mpsc::channel(32);
        let id = ConnectionId::generate();
        pusher.register_client(id, tx).await;
        viewers.push((id, rx));
    }
    viewers
}

/// Everything currently queued for one viewer, parsed as JSON
pub(crate) fn drain_json(rx: &mut mpsc::Receiver<String>) -> Vec<serde_json::Value> {
    let mut out = Vec::new();
    while let Ok(text) = rx.try_recv() {
        out.push(serde_json::from_str(&text).unwrap());
    }
    out
}
