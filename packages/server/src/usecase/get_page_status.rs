//! UseCase: 現在ページと接続数の取得

use std::sync::Arc;

use gaze_relay_shared::time::Clock;

use crate::{
    domain::{MessagePusher, PageState},
    infrastructure::page_state::CurrentPageState,
};

/// `GET /page-status` の内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageStatus {
    pub page: PageState,
    pub connected_clients: usize,
    /// Unix seconds
    pub timestamp_seconds: i64,
}

pub struct GetPageStatusUseCase {
    page_state: Arc<CurrentPageState>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl GetPageStatusUseCase {
    pub fn new(
        page_state: Arc<CurrentPageState>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            page_state,
            message_pusher,
            clock,
        }
    }

    pub async fn execute(&self) -> PageStatus {
        PageStatus {
            page: self.page_state.get(),
            connected_clients: self.message_pusher.count_clients().await,
            timestamp_seconds: self.clock.now_seconds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{PageChange, PageId, Timestamp},
        infrastructure::message_pusher::WebSocketMessagePusher,
        usecase::test_support::register_viewers,
    };
    use gaze_relay_shared::time::FixedClock;

    #[tokio::test]
    async fn test_status_before_any_page_change() {
        // テスト項目: ページ変更前は現在ページが空で、接続数と時刻が返る
        // given (前提条件):
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let _viewers = register_viewers(pusher.as_ref(), 2).await;
        let usecase = GetPageStatusUseCase::new(
            Arc::new(CurrentPageState::new()),
            pusher,
            Arc::new(FixedClock::new(1_700_000_000_123)),
        );

        // when (操作):
        let status = usecase.execute().await;

        // then (期待する結果):
        assert!(status.page.page.is_none());
        assert_eq!(status.connected_clients, 2);
        assert_eq!(status.timestamp_seconds, 1_700_000_000);
    }

    #[tokio::test]
    async fn test_status_reflects_latest_page() {
        // テスト項目: 最後のページ変更が現在ページとして返る
        // given (前提条件):
        let page_state = Arc::new(CurrentPageState::new());
        page_state.update(&PageChange::new(
            PageId::new("intro".to_string()).unwrap(),
            Timestamp::new(1),
        ));
        page_state.update(&PageChange::new(
            PageId::new("loans".to_string()).unwrap(),
            Timestamp::new(2),
        ));
        let usecase = GetPageStatusUseCase::new(
            page_state,
            Arc::new(WebSocketMessagePusher::new()),
            Arc::new(FixedClock::new(0)),
        );

        // when (操作):
        let status = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(status.page.page.unwrap().as_str(), "loans");
        assert_eq!(status.connected_clients, 0);
    }
}
