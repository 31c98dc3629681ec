//! Shared application state.

use std::sync::Arc;

use crate::{
    config::ConnectionSettings,
    usecase::{
        ChangePageUseCase, ClearHistoryUseCase, ConnectViewerUseCase, DisconnectViewerUseCase,
        GetPageStatusUseCase, GetRecentSamplesUseCase, RecordSampleUseCase,
    },
};

/// Shared application state
///
/// ハンドラーから呼び出す UseCase だけを保持します。周期処理の UseCase は worker が持ちます。
pub struct AppState {
    pub connect_viewer_usecase: Arc<ConnectViewerUseCase>,
    pub disconnect_viewer_usecase: Arc<DisconnectViewerUseCase>,
    pub record_sample_usecase: Arc<RecordSampleUseCase>,
    pub change_page_usecase: Arc<ChangePageUseCase>,
    pub get_page_status_usecase: Arc<GetPageStatusUseCase>,
    pub get_recent_samples_usecase: Arc<GetRecentSamplesUseCase>,
    pub clear_history_usecase: Arc<ClearHistoryUseCase>,
    pub connection: ConnectionSettings,
}
