//! UseCase: ページ変更
//!
//! ページ変更はコアレッシングされず、受信した時点で
//! 現在ページの更新・保存・publish・ブロードキャストを行います。

use std::sync::Arc;

use gaze_relay_shared::time::Clock;

use crate::{
    domain::{
        BroadcastReport, BrokerMessage, GazeRepository, MessageBroker, MessagePusher, PageChange,
        broker::PAGE_CHANGE_KEY,
    },
    infrastructure::{
        dto::websocket::{Envelope, MessageType, PageChangeData},
        page_state::CurrentPageState,
    },
};

use super::{
    delivery::{broadcast_and_announce_evictions, publish_detached},
    error::EncodeError,
};

/// ページ変更のユースケース
pub struct ChangePageUseCase {
    page_state: Arc<CurrentPageState>,
    repository: Arc<dyn GazeRepository>,
    broker: Arc<dyn MessageBroker>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ChangePageUseCase {
    pub fn new(
        page_state: Arc<CurrentPageState>,
        repository: Arc<dyn GazeRepository>,
        broker: Arc<dyn MessageBroker>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            page_state,
            repository,
            broker,
            message_pusher,
            clock,
        }
    }

    /// ページ変更を処理する
    ///
    /// publish とブロードキャストを先に行い、保存は待たない。
    /// 保存と publish の失敗はログに残すだけで、ブロードキャストは必ず行う。
    pub async fn execute(&self, change: PageChange) -> Result<BroadcastReport, EncodeError> {
        self.page_state.update(&change);
        tracing::info!("Current page changed to '{}'", change.page_id.as_str());

        let json = Envelope::PageChange(PageChangeData::from(&change))
            .to_json()
            .map_err(|e| EncodeError::new(MessageType::PageChange.as_str(), e))?;

        publish_detached(
            self.broker.as_ref(),
            BrokerMessage::new(PAGE_CHANGE_KEY, json.clone()),
        );
        let report = broadcast_and_announce_evictions(
            self.message_pusher.as_ref(),
            self.clock.as_ref(),
            &json,
        )
        .await;

        self.save_detached(change);
        Ok(report)
    }

    /// 保存はバックグラウンドで行い、遅いストレージがページ変更の配信を止めないようにする
    fn save_detached(&self, change: PageChange) {
        let repository = self.repository.clone();
        tokio::spawn(async move {
            if let Err(e) = repository.save_page_change(&change).await {
                tracing::warn!(
                    "Failed to save page change '{}': {}",
                    change.page_id.as_str(),
                    e
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use super::*;
    use crate::{
        domain::{
            PageId, PositionSample, PurgeCounts, RepositoryError, StoredSample, Timestamp,
            repository::MockGazeRepository,
        },
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryGazeRepository,
        },
        usecase::test_support::{RecordingBroker, drain_json, register_viewers},
    };
    use async_trait::async_trait;
    use gaze_relay_shared::time::FixedClock;
    use tokio::sync::{Notify, mpsc};

    fn change(page: &str, timestamp: i64) -> PageChange {
        PageChange::new(PageId::new(page.to_string()).unwrap(), Timestamp::new(timestamp))
    }

    /// ゲートが開くまでページ変更の保存が終わらないリポジトリ
    #[derive(Default)]
    struct GatedRepository {
        gate: Notify,
        saved: AtomicUsize,
    }

    #[async_trait]
    impl GazeRepository for GatedRepository {
        async fn save_sample(&self, _sample: &PositionSample) -> Result<(), RepositoryError> {
            Ok(())
        }

        async fn save_page_change(&self, _change: &PageChange) -> Result<(), RepositoryError> {
            self.gate.notified().await;
            self.saved.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn recent_samples(&self, _limit: usize) -> Result<Vec<StoredSample>, RepositoryError> {
            Ok(Vec::new())
        }

        async fn clear_all(&self) -> Result<PurgeCounts, RepositoryError> {
            Ok(PurgeCounts::default())
        }

        async fn delete_older_than(
            &self,
            _retention: Duration,
        ) -> Result<PurgeCounts, RepositoryError> {
            Ok(PurgeCounts::default())
        }
    }

    #[tokio::test]
    async fn test_page_change_is_broadcast_and_published_immediately() {
        // テスト項目: gazeData がなくてもページ変更は即座にブロードキャスト・publish される
        // given (前提条件):
        let page_state = Arc::new(CurrentPageState::new());
        let repository = Arc::new(InMemoryGazeRepository::new());
        let broker = Arc::new(RecordingBroker::default());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = ChangePageUseCase::new(
            page_state.clone(),
            repository.clone(),
            broker.clone(),
            pusher.clone(),
            Arc::new(FixedClock::new(0)),
        );
        let mut viewers = register_viewers(pusher.as_ref(), 2).await;

        // when (操作):
        let report = usecase.execute(change("loans", 1234)).await.unwrap();

        // then (期待する結果):
        assert_eq!(report.delivered, 2);
        for (_, rx) in viewers.iter_mut() {
            let received = drain_json(rx);
            assert_eq!(received.len(), 1);
            assert_eq!(received[0]["type"], "pageChange");
            assert_eq!(received[0]["data"]["currentPage"], "loans");
            assert_eq!(received[0]["data"]["timestamp"], 1234);
        }

        let published = broker.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].key, "page");

        let state = page_state.get();
        assert_eq!(state.page.unwrap().as_str(), "loans");
        assert_eq!(state.updated_at, Some(Timestamp::new(1234)));

        // 保存はバックグラウンドタスクで行われる
        for _ in 0..100 {
            if repository.count_page_changes().await == 1 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(repository.count_page_changes().await, 1);
    }

    #[tokio::test]
    async fn test_slow_storage_does_not_delay_broadcast() {
        // テスト項目: 保存が終わらなくてもページ変更はすぐに配信・publish される
        // given (前提条件): 保存がゲートで止まるリポジトリ
        let repository = Arc::new(GatedRepository::default());
        let broker = Arc::new(RecordingBroker::default());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = ChangePageUseCase::new(
            Arc::new(CurrentPageState::new()),
            repository.clone(),
            broker.clone(),
            pusher.clone(),
            Arc::new(FixedClock::new(0)),
        );
        let mut viewers = register_viewers(pusher.as_ref(), 1).await;

        // when (操作):
        let result =
            tokio::time::timeout(Duration::from_millis(200), usecase.execute(change("faq", 9)))
                .await;

        // then (期待する結果): 保存の完了を待たずに戻る
        let report = result.expect("page change waited for storage").unwrap();
        assert_eq!(report.delivered, 1);
        assert_eq!(drain_json(&mut viewers[0].1).len(), 1);
        assert_eq!(broker.published().len(), 1);
        assert_eq!(repository.saved.load(Ordering::SeqCst), 0);

        // ゲートを開けると保存が完了する
        repository.gate.notify_one();
        for _ in 0..100 {
            if repository.saved.load(Ordering::SeqCst) == 1 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(repository.saved.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_storage_failure_does_not_block_broadcast() {
        // テスト項目: ページ変更の保存に失敗してもブロードキャストと publish は行われる
        // given (前提条件):
        let (attempted_tx, mut attempted_rx) = mpsc::unbounded_channel();
        let mut repository = MockGazeRepository::new();
        repository
            .expect_save_page_change()
            .times(1)
            .returning(move |_| {
                let _ = attempted_tx.send(());
                Err(RepositoryError::Backend("connection refused".to_string()))
            });
        let broker = Arc::new(RecordingBroker::default());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = ChangePageUseCase::new(
            Arc::new(CurrentPageState::new()),
            Arc::new(repository),
            broker.clone(),
            pusher.clone(),
            Arc::new(FixedClock::new(0)),
        );
        let mut viewers = register_viewers(pusher.as_ref(), 1).await;

        // when (操作):
        let report = usecase.execute(change("intro", 1)).await.unwrap();

        // then (期待する結果):
        assert_eq!(report.delivered, 1);
        assert_eq!(drain_json(&mut viewers[0].1).len(), 1);
        assert_eq!(broker.published().len(), 1);
        assert_eq!(attempted_rx.recv().await, Some(()));
    }
}
