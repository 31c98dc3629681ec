//! UseCase: ビューアー切断処理
//!
//! 読み込みエラー・正常なクローズ・アイドルタイムアウトのいずれでも、
//! 接続ハンドラーはこのユースケースを 1 度だけ呼び出します。

use std::sync::Arc;

use gaze_relay_shared::time::Clock;

use crate::domain::{ConnectionId, MessagePusher};

use super::delivery::broadcast_client_count;

/// ビューアー切断のユースケース
pub struct DisconnectViewerUseCase {
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl DisconnectViewerUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            message_pusher,
            clock,
        }
    }

    /// 接続を登録解除する（冪等）
    ///
    /// 実際に削除した場合だけ残りの接続へ接続数を通知し、削除後の接続数を返す。
    /// ブロードキャスト失敗で既に削除されていた場合は `None`。
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<usize> {
        let remaining = self.message_pusher.unregister_client(connection_id).await?;
        broadcast_client_count(self.message_pusher.as_ref(), self.clock.as_ref(), remaining).await;
        Some(remaining)
    }
}
