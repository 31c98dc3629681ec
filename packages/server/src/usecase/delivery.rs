//! Publish / broadcast helpers shared by the use cases.

use gaze_relay_shared::time::Clock;

use crate::{
    domain::{BroadcastReport, BrokerMessage, MessageBroker, MessagePusher},
    infrastructure::dto::websocket::{ClientCountData, Envelope},
};

/// Enqueue a message and log its transmission outcome in the background.
///
/// Returns `false` when the publisher refused the message outright.
pub(crate) fn publish_detached(broker: &dyn MessageBroker, message: BrokerMessage) -> bool {
    let key = message.key.clone();
    match broker.publish(message) {
        Ok(receipt) => {
            tokio::spawn(async move {
                if let Err(e) = receipt.outcome().await {
                    tracing::warn!("Failed to publish '{}' message to broker: {}", key, e);
                }
            });
            true
        }
        Err(e) => {
            tracing::warn!("Broker refused '{}' message: {}", key, e);
            false
        }
    }
}

/// Tell every viewer how many viewers are connected.
pub(crate) async fn broadcast_client_count(
    message_pusher: &dyn MessagePusher,
    clock: &dyn Clock,
    count: usize,
) -> BroadcastReport {
    let envelope = Envelope::ClientCount(ClientCountData {
        count,
        timestamp: clock.now_seconds(),
    });
    match envelope.to_json() {
        Ok(json) => message_pusher.broadcast(&json).await,
        Err(e) => {
            tracing::warn!("Failed to encode clientCount envelope: {}", e);
            BroadcastReport::default()
        }
    }
}

/// Broadcast `content` and, if that evicted any viewer, announce the new count.
pub(crate) async fn broadcast_and_announce_evictions(
    message_pusher: &dyn MessagePusher,
    clock: &dyn Clock,
    content: &str,
) -> BroadcastReport {
    let report = message_pusher.broadcast(content).await;
    if report.failed > 0 {
        let remaining = message_pusher.count_clients().await;
        broadcast_client_count(message_pusher, clock, remaining).await;
    }
    report
}
