//! UseCase: 視線データの受信
//!
//! 受信したサンプルはスナップショットに上書きされるだけで、送信は
//! 次のティックで FlushSnapshotUseCase が行います。

use std::sync::Arc;

use crate::{domain::PositionSample, infrastructure::snapshot::SnapshotStore};

/// 視線データ受信のユースケース
pub struct RecordSampleUseCase {
    snapshot: Arc<SnapshotStore>,
}

impl RecordSampleUseCase {
    pub fn new(snapshot: Arc<SnapshotStore>) -> Self {
        Self { snapshot }
    }

    /// 最新サンプルとしてスナップショットに書き込む（常に成功）
    pub fn execute(&self, sample: PositionSample) {
        self.snapshot.write(sample);
    }
}
