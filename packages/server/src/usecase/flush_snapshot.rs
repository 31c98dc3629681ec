//! UseCase: スナップショットの送出（コアレッシングの 1 ティック分）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - FlushSnapshotUseCase::execute() メソッド
//! - スナップショットを取り出し、ブローカーへの publish と全ビューアーへのブロードキャストを行う
//!
//! ### どのような状況を想定しているか
//! - 正常系：3 接続に 1 件の gazeData が届き、publish も 1 件
//! - エッジケース：スナップショットが空なら何もしない
//! - 異常系：publish が拒否されてもブロードキャストは行われる

use std::sync::Arc;

use gaze_relay_shared::time::Clock;

use crate::{
    domain::{BroadcastReport, BrokerMessage, MessageBroker, MessagePusher, broker::SAMPLE_KEY},
    infrastructure::{
        dto::websocket::{Envelope, GazeData, MessageType},
        snapshot::SnapshotStore,
    },
};

use super::{
    delivery::{broadcast_and_announce_evictions, publish_detached},
    error::EncodeError,
};

/// 1 ティックで行った処理の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushOutcome {
    /// ブローカーがメッセージを受け付けたか
    pub enqueued: bool,
    /// ブロードキャストの結果
    pub report: BroadcastReport,
}

/// スナップショット送出のユースケース
pub struct FlushSnapshotUseCase {
    snapshot: Arc<SnapshotStore>,
    broker: Arc<dyn MessageBroker>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl FlushSnapshotUseCase {
    pub fn new(
        snapshot: Arc<SnapshotStore>,
        broker: Arc<dyn MessageBroker>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            snapshot,
            broker,
            message_pusher,
            clock,
        }
    }

    /// スナップショットを取り出して送出する
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - スナップショットが空だった（何もしていない）
    /// * `Ok(Some(FlushOutcome))` - 送出した
    /// * `Err(EncodeError)` - エンベロープを JSON にできなかった（サンプルは破棄される）
    pub async fn execute(&self) -> Result<Option<FlushOutcome>, EncodeError> {
        let Some(sample) = self.snapshot.drain_if_present() else {
            return Ok(None);
        };

        // 1 回だけシリアライズし、publish とブロードキャストで同じ JSON を使う
        let json = Envelope::GazeData(GazeData::from(&sample))
            .to_json()
            .map_err(|e| EncodeError::new(MessageType::GazeData.as_str(), e))?;

        // publish はキューに積むだけなので、ブロードキャストを待たせない
        let enqueued = publish_detached(
            self.broker.as_ref(),
            BrokerMessage::new(SAMPLE_KEY, json.clone()),
        );
        let report = broadcast_and_announce_evictions(
            self.message_pusher.as_ref(),
            self.clock.as_ref(),
            &json,
        )
        .await;

        tracing::trace!(
            "Flushed sample ({}, {}) to {} viewer(s)",
            sample.x,
            sample.y,
            report.delivered
        );
        Ok(Some(FlushOutcome { enqueued, report }))
    }
}
