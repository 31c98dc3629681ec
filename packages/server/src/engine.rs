//! Dependency wiring.
//!
//! Builds the state components, the batching publisher, every use case and the
//! background loops from a repository and a broker transport. The binary and
//! the integration tests share this so they run the same graph.

use std::sync::Arc;

use gaze_relay_shared::time::Clock;
use tokio::task::JoinHandle;

use crate::{
    config::EngineSettings,
    domain::{BrokerTransport, GazeRepository},
    infrastructure::{
        broker::BatchingPublisher, message_pusher::WebSocketMessagePusher,
        page_state::CurrentPageState, snapshot::SnapshotStore,
    },
    ui::state::AppState,
    usecase::{
        ChangePageUseCase, ClearHistoryUseCase, ConnectViewerUseCase, DisconnectViewerUseCase,
        FlushSnapshotUseCase, GetPageStatusUseCase, GetRecentSamplesUseCase, RecordSampleUseCase,
        SweepRetentionUseCase,
    },
    worker::BackgroundTasks,
};

/// Everything that keeps running besides the HTTP server
pub struct EngineRuntime {
    background: BackgroundTasks,
    publisher: Arc<BatchingPublisher>,
    publisher_task: JoinHandle<()>,
}

impl EngineRuntime {
    /// Stop the periodic loops, then flush and stop the broker publisher.
    pub async fn shutdown(self) {
        self.background.shutdown().await;
        self.publisher.close();
        if let Err(e) = self.publisher_task.await {
            tracing::error!("Broker publisher ended abnormally: {}", e);
        }
        tracing::info!("Broker publisher stopped");
    }
}

/// Wire every component and start the background tasks.
///
/// Must be called from within a tokio runtime.
pub fn start(
    settings: EngineSettings,
    repository: Arc<dyn GazeRepository>,
    transport: Arc<dyn BrokerTransport>,
    clock: Arc<dyn Clock>,
) -> (AppState, EngineRuntime) {
    // 1. State components
    let snapshot = Arc::new(SnapshotStore::new());
    let page_state = Arc::new(CurrentPageState::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 2. Broker publisher
    let (publisher, publisher_task) = BatchingPublisher::spawn(transport, settings.batch);
    let publisher = Arc::new(publisher);

    // 3. UseCases
    let flush_snapshot_usecase = Arc::new(FlushSnapshotUseCase::new(
        snapshot.clone(),
        publisher.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let sweep_retention_usecase = Arc::new(SweepRetentionUseCase::new(
        repository.clone(),
        settings.retention,
    ));
    let app_state = AppState {
        connect_viewer_usecase: Arc::new(ConnectViewerUseCase::new(
            message_pusher.clone(),
            clock.clone(),
        )),
        disconnect_viewer_usecase: Arc::new(DisconnectViewerUseCase::new(
            message_pusher.clone(),
            clock.clone(),
        )),
        record_sample_usecase: Arc::new(RecordSampleUseCase::new(snapshot)),
        change_page_usecase: Arc::new(ChangePageUseCase::new(
            page_state.clone(),
            repository.clone(),
            publisher.clone(),
            message_pusher.clone(),
            clock.clone(),
        )),
        get_page_status_usecase: Arc::new(GetPageStatusUseCase::new(
            page_state,
            message_pusher,
            clock,
        )),
        get_recent_samples_usecase: Arc::new(GetRecentSamplesUseCase::new(repository.clone())),
        clear_history_usecase: Arc::new(ClearHistoryUseCase::new(repository)),
        connection: settings.connection,
    };

    // 4. Background loops
    let background = BackgroundTasks::spawn(
        flush_snapshot_usecase,
        sweep_retention_usecase,
        settings.worker,
    );

    (
        app_state,
        EngineRuntime {
            background,
            publisher,
            publisher_task,
        },
    )
}
