//! MessagePusher trait 定義
//!
//! 接続中のビューアーへメッセージを届けるためのインターフェース（Connection Registry）。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::value_object::ConnectionId;

/// 各接続の送信タスクへメッセージを渡すチャンネル
///
/// 容量付きのチャンネルで、満杯（送信タスクが書き込みに追いつかない）の接続は
/// 送信失敗として扱われる。
pub type PusherChannel = mpsc::Sender<String>;

/// 1 回のブロードキャストの結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// 送信に成功した接続数
    pub delivered: usize,
    /// 送信に失敗し、レジストリから削除された接続数
    pub failed: usize,
}

impl BroadcastReport {
    /// 送信を試みた接続数
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed
    }
}

/// MessagePusher trait
///
/// UseCase 層はこの trait に依存し、WebSocket などの具体的な実装には依存しない。
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を登録し、登録後の接続数を返す
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) -> usize;

    /// 接続を登録解除する（冪等）
    ///
    /// 削除した場合は削除後の接続数、既に存在しなかった場合は `None` を返す
    async fn unregister_client(&self, connection_id: &ConnectionId) -> Option<usize>;

    /// 呼び出し時点で登録されている全ての接続へ送信する
    ///
    /// 送信に失敗した接続（チャンネルが閉じている、または満杯）はブロードキャスト後に
    /// まとめて削除される。エラーは返さない。
    async fn broadcast(&self, content: &str) -> BroadcastReport;

    /// 接続中のクライアント数を取得
    async fn count_clients(&self) -> usize;
}
