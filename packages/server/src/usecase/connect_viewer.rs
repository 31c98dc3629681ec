//! UseCase: ビューアー接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectViewerUseCase::execute() メソッド
//! - 接続の登録と、全接続への接続数（clientCount）の通知
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続の登録
//! - 複数接続：接続のたびに全員へ最新の接続数が届く

use std::sync::Arc;

use gaze_relay_shared::time::Clock;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel};

use super::delivery::broadcast_client_count;

/// ビューアー接続のユースケース
pub struct ConnectViewerUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ConnectViewerUseCase {
    /// 新しい ConnectViewerUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            message_pusher,
            clock,
        }
    }

    /// 接続を登録し、登録後の接続数を返す
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 接続 ID（Domain Model）
    /// * `sender` - 接続の送信タスクへのチャンネル
    pub async fn execute(&self, connection_id: ConnectionId, sender: PusherChannel) -> usize {
        let count = self
            .message_pusher
            .register_client(connection_id, sender)
            .await;
        broadcast_client_count(self.message_pusher.as_ref(), self.clock.as_ref(), count).await;
        count
    }
}
