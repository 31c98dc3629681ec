//! UseCase 層
//!
//! 1 操作 = 1 構造体。依存は `Arc<dyn Trait>`（MessagePusher / MessageBroker /
//! GazeRepository）とプロセス内の状態コンポーネントとして受け取ります。

mod change_page;
mod clear_history;
mod connect_viewer;
mod delivery;
mod disconnect_viewer;
mod error;
mod flush_snapshot;
mod get_page_status;
mod get_recent_samples;
mod record_sample;
mod sweep_retention;
#[cfg(test)]
pub(crate) mod test_support;

pub use change_page::ChangePageUseCase;
pub use clear_history::ClearHistoryUseCase;
pub use connect_viewer::ConnectViewerUseCase;
pub use disconnect_viewer::DisconnectViewerUseCase;
pub use error::{EncodeError, HistoryError};
pub use flush_snapshot::{FlushOutcome, FlushSnapshotUseCase};
pub use get_page_status::{GetPageStatusUseCase, PageStatus};
pub use get_recent_samples::{DEFAULT_RECENT_LIMIT, GetRecentSamplesUseCase, MAX_RECENT_LIMIT};
pub use record_sample::RecordSampleUseCase;
pub use sweep_retention::SweepRetentionUseCase;
