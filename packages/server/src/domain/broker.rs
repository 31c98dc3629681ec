//! Broker trait 定義
//!
//! 永続化はブローカー経由で独立したコンシューマーが行うため、ライブ経路は
//! メッセージを「渡すだけ」です。`MessageBroker` は呼び出し側から見た
//! fire-and-forget の publish、`BrokerTransport` は実際の送信先（Kafka など）を表します。

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::error::BrokerError;

/// Broker record key for coalesced position samples
pub const SAMPLE_KEY: &str = "gaze";
/// Broker record key for page changes
pub const PAGE_CHANGE_KEY: &str = "page";

/// One record handed to the broker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerMessage {
    /// Partition key
    pub key: String,
    /// JSON envelope
    pub payload: String,
}

impl BrokerMessage {
    pub fn new(key: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            payload: payload.into(),
        }
    }
}

/// Resolves once the batch containing the message has been transmitted (or failed).
#[derive(Debug)]
pub struct PublishReceipt {
    rx: oneshot::Receiver<Result<(), BrokerError>>,
}

impl PublishReceipt {
    pub fn new(rx: oneshot::Receiver<Result<(), BrokerError>>) -> Self {
        Self { rx }
    }

    /// A receipt whose outcome is already known
    pub fn ready(result: Result<(), BrokerError>) -> Self {
        let (tx, rx) = oneshot::channel();
        // rx is still held here, so the send cannot fail
        let _ = tx.send(result);
        Self { rx }
    }

    /// Wait for the transmission outcome.
    ///
    /// A dropped sender means the batching task stopped before reporting.
    pub async fn outcome(self) -> Result<(), BrokerError> {
        self.rx.await.unwrap_or(Err(BrokerError::Closed))
    }
}

/// Caller-facing publish operation
pub trait MessageBroker: Send + Sync {
    /// Enqueue a message and return immediately.
    ///
    /// Errors returned here are immediate (publisher closed); transmission
    /// failures are reported through the receipt.
    fn publish(&self, message: BrokerMessage) -> Result<PublishReceipt, BrokerError>;
}

/// Transmits a batch of records to the external broker
#[async_trait]
pub trait BrokerTransport: Send + Sync {
    async fn send_batch(&self, batch: &[BrokerMessage]) -> Result<(), BrokerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ready_receipt_resolves_immediately() {
        // テスト項目: 結果が既知のレシートはそのまま結果を返す
        // given (前提条件):
        let ok = PublishReceipt::ready(Ok(()));
        let err = PublishReceipt::ready(Err(BrokerError::Transport("down".to_string())));

        // when (操作):
        let ok = ok.outcome().await;
        let err = err.outcome().await;

        // then (期待する結果):
        assert_eq!(ok, Ok(()));
        assert_eq!(err, Err(BrokerError::Transport("down".to_string())));
    }

    #[tokio::test]
    async fn test_receipt_reports_closed_when_sender_dropped() {
        // テスト項目: 送信側が結果を返さずに破棄された場合は Closed になる
        // given (前提条件):
        let (tx, rx) = oneshot::channel();
        let receipt = PublishReceipt::new(rx);

        // when (操作):
        drop(tx);
        let result = receipt.outcome().await;

        // then (期待する結果):
        assert_eq!(result, Err(BrokerError::Closed));
    }
}
