//! WebSocket を使った MessagePusher 実装（Connection Registry）
//!
//! ## 責務
//!
//! - 接続ごとの `PusherChannel` を接続 ID をキーに管理
//! - 全接続へのブロードキャストと、送信に失敗した接続の遅延削除
//!
//! ## ロックの扱い
//!
//! ブロードキャストは読み取りロックでメンバー一覧をスナップショットした後、ロックを
//! 解放してから送信します。送信失敗した接続はループ終了後に書き込みロックで一括削除します。
//! ネットワーク I/O は各接続の送信タスク（UI 層）が行うため、ロック中に I/O は発生しません。
//! 送信は `try_send` で待たずに行い、キューが満杯の接続は失敗した接続と同じく削除します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{RwLock, mpsc::error::TrySendError};

use crate::domain::{BroadcastReport, ConnectionId, MessagePusher, PusherChannel};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new();
/// let count = pusher.register_client(ConnectionId::generate(), tx).await;
/// let report = pusher.broadcast("{\"type\":\"gazeData\",...}").await;
/// ```
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの送信チャンネル
    ///
    /// Key: ConnectionId
    /// Value: PusherChannel
    clients: RwLock<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 送信に失敗した接続を一括で削除する
    ///
    /// 読み込みループ側が先に削除していた場合はスキップする。
    /// チャンネルの送信側を破棄することで、接続の送信タスクも終了する。
    async fn cleanup_failed_clients(&self, failed: &[ConnectionId]) -> usize {
        let mut clients = self.clients.write().await;
        let cleaned = failed
            .iter()
            .filter(|id| clients.remove(*id).is_some())
            .count();
        let remaining = clients.len();
        drop(clients);

        if cleaned > 0 {
            tracing::info!(
                "Cleaned up {} failed client(s) ({} remaining)",
                cleaned,
                remaining
            );
        }
        cleaned
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) -> usize {
        let mut clients = self.clients.write().await;
        clients.insert(connection_id, sender);
        let count = clients.len();
        tracing::debug!(
            "Client '{}' registered to MessagePusher ({} total)",
            connection_id,
            count
        );
        count
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) -> Option<usize> {
        let mut clients = self.clients.write().await;
        if clients.remove(connection_id).is_some() {
            let count = clients.len();
            tracing::debug!(
                "Client '{}' unregistered from MessagePusher ({} remaining)",
                connection_id,
                count
            );
            Some(count)
        } else {
            tracing::debug!("Client '{}' was already unregistered", connection_id);
            None
        }
    }

    async fn broadcast(&self, content: &str) -> BroadcastReport {
        let targets: Vec<(ConnectionId, PusherChannel)> = {
            let clients = self.clients.read().await;
            clients
                .iter()
                .map(|(id, sender)| (*id, sender.clone()))
                .collect()
        };

        let mut delivered = 0;
        let mut failed = Vec::new();
        // ブロードキャストでは一部の送信失敗を許容し、残りの接続への送信を続ける
        for (connection_id, sender) in targets {
            match sender.try_send(content.to_string()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(
                        "Client '{}' is not draining its queue, dropping it",
                        connection_id
                    );
                    failed.push(connection_id);
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::warn!("Failed to push message to client '{}': closed", connection_id);
                    failed.push(connection_id);
                }
            }
        }

        if !failed.is_empty() {
            self.cleanup_failed_clients(&failed).await;
        }

        BroadcastReport {
            delivered,
            failed: failed.len(),
        }
    }

    async fn count_clients(&self) -> usize {
        self.clients.read().await.len()
    }
}
