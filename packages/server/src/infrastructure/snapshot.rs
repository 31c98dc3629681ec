//! Snapshot Store
//!
//! 最新の視線サンプルを 1 件だけ保持するメールボックス。キューではないため、
//! ティック間に届いたサンプルは最後に書き込まれたものだけが残ります。

use parking_lot::Mutex;

use crate::domain::PositionSample;

/// Single-slot, most-recent-wins buffer between ingestion and the coalescing tick.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    slot: Mutex<Option<PositionSample>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the slot unconditionally.
    pub fn write(&self, sample: PositionSample) {
        *self.slot.lock() = Some(sample);
    }

    /// Take the pending sample, leaving the slot empty.
    pub fn drain_if_present(&self) -> Option<PositionSample> {
        self.slot.lock().take()
    }
}
