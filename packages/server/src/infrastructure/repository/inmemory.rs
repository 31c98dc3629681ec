//! InMemory Gaze Repository 実装
//!
//! ドメイン層が定義する GazeRepository trait の具体的な実装。
//! `DATABASE_URL` が指定されていない場合に使われ、プロセス終了とともに内容は失われます。
//! 行の作成時刻は注入された [`Clock`] から取得するため、保持期間の掃除もテストできます。

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use gaze_relay_shared::time::{Clock, SystemClock};
use tokio::sync::Mutex;

use crate::domain::{
    GazeRepository, PageChange, PositionSample, PurgeCounts, RepositoryError, StoredSample,
    Timestamp,
};

#[derive(Default)]
struct Tables {
    /// 最後に払い出した行 ID
    last_id: i64,
    gaze_data: Vec<StoredSample>,
    /// (ページ変更, 作成時刻)
    page_changes: Vec<(PageChange, Timestamp)>,
}

/// インメモリ Gaze Repository 実装
pub struct InMemoryGazeRepository {
    tables: Mutex<Tables>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryGazeRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGazeRepository {
    /// システム時刻を使う InMemoryGazeRepository を作成
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            clock,
        }
    }

    /// 保存済みのページ変更件数
    pub async fn count_page_changes(&self) -> usize {
        self.tables.lock().await.page_changes.len()
    }
}

#[async_trait]
impl GazeRepository for InMemoryGazeRepository {
    async fn save_sample(&self, sample: &PositionSample) -> Result<(), RepositoryError> {
        let created_at = Timestamp::new(self.clock.now_millis());
        let mut tables = self.tables.lock().await;
        tables.last_id += 1;
        let id = tables.last_id;
        tables.gaze_data.push(StoredSample {
            id,
            sample: sample.clone(),
            created_at: Some(created_at),
        });
        Ok(())
    }

    async fn save_page_change(&self, change: &PageChange) -> Result<(), RepositoryError> {
        let created_at = Timestamp::new(self.clock.now_millis());
        let mut tables = self.tables.lock().await;
        tables.page_changes.push((change.clone(), created_at));
        Ok(())
    }

    async fn recent_samples(&self, limit: usize) -> Result<Vec<StoredSample>, RepositoryError> {
        let tables = self.tables.lock().await;
        // 挿入順 = 作成時刻順なので、末尾から取れば新しい順になる
        Ok(tables.gaze_data.iter().rev().take(limit).cloned().collect())
    }

    async fn clear_all(&self) -> Result<PurgeCounts, RepositoryError> {
        let mut tables = self.tables.lock().await;
        let counts = PurgeCounts {
            samples: tables.gaze_data.len() as u64,
            page_changes: tables.page_changes.len() as u64,
        };
        tables.gaze_data.clear();
        tables.page_changes.clear();
        Ok(counts)
    }

    async fn delete_older_than(&self, retention: Duration) -> Result<PurgeCounts, RepositoryError> {
        let retention_millis = i64::try_from(retention.as_millis()).unwrap_or(i64::MAX);
        let cutoff = self.clock.now_millis().saturating_sub(retention_millis);

        let mut tables = self.tables.lock().await;
        let samples_before = tables.gaze_data.len();
        tables
            .gaze_data
            .retain(|row| row.created_at.is_none_or(|t| t.value() >= cutoff));
        let pages_before = tables.page_changes.len();
        tables
            .page_changes
            .retain(|(_, created_at)| created_at.value() >= cutoff);

        Ok(PurgeCounts {
            samples: (samples_before - tables.gaze_data.len()) as u64,
            page_changes: (pages_before - tables.page_changes.len()) as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PageId;
    use gaze_relay_shared::time::FixedClock;
    use std::sync::atomic::{AtomicI64, Ordering};

    const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

    fn sample(x: f64, y: f64) -> PositionSample {
        PositionSample::new(x, y, Timestamp::new(1), None, None).unwrap()
    }

    fn page_change(page: &str) -> PageChange {
        PageChange::new(PageId::new(page.to_string()).unwrap(), Timestamp::new(1))
    }

    #[tokio::test]
    async fn test_recent_samples_are_newest_first() {
        // テスト項目: 取得結果は新しい順で、limit 件までに制限される
        // given (前提条件):
        let repo = InMemoryGazeRepository::new();
        for i in 0..5 {
            repo.save_sample(&sample(i as f64, 0.0)).await.unwrap();
        }

        // when (操作):
        let rows = repo.recent_samples(3).await.unwrap();

        // then (期待する結果):
        let xs: Vec<f64> = rows.iter().map(|r| r.sample.x).collect();
        assert_eq!(xs, vec![4.0, 3.0, 2.0]);
        assert_eq!(rows[0].id, 5);
        assert!(rows[0].created_at.is_some());
    }

    #[tokio::test]
    async fn test_clear_all_reports_deleted_rows() {
        // テスト項目: 全削除で削除件数が返り、以後は空になる
        // given (前提条件):
        let repo = InMemoryGazeRepository::new();
        repo.save_sample(&sample(1.0, 1.0)).await.unwrap();
        repo.save_sample(&sample(2.0, 2.0)).await.unwrap();
        repo.save_page_change(&page_change("intro")).await.unwrap();

        // when (操作):
        let counts = repo.clear_all().await.unwrap();

        // then (期待する結果):
        assert_eq!(
            counts,
            PurgeCounts {
                samples: 2,
                page_changes: 1
            }
        );
        assert!(repo.recent_samples(10).await.unwrap().is_empty());
        assert_eq!(repo.count_page_changes().await, 0);
    }

    // 手動で進められる時計
    struct ManualClock(AtomicI64);

    impl Clock for ManualClock {
        fn now_millis(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    #[tokio::test]
    async fn test_delete_older_than_keeps_recent_rows() {
        // テスト項目: 保持期間より古い行だけが削除される
        // given (前提条件): 10 日前に書かれた行と、現在書かれた行
        let now = 100 * DAY_MILLIS;
        let clock = Arc::new(ManualClock(AtomicI64::new(now - 10 * DAY_MILLIS)));
        let repo = InMemoryGazeRepository::with_clock(clock.clone());
        repo.save_sample(&sample(1.0, 1.0)).await.unwrap();
        repo.save_page_change(&page_change("intro")).await.unwrap();

        clock.0.store(now, Ordering::SeqCst);
        repo.save_sample(&sample(2.0, 2.0)).await.unwrap();

        // when (操作):
        let counts = repo
            .delete_older_than(Duration::from_secs(7 * 24 * 60 * 60))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(
            counts,
            PurgeCounts {
                samples: 1,
                page_changes: 1
            }
        );
        let rows = repo.recent_samples(10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sample.x, 2.0);
    }

    #[tokio::test]
    async fn test_created_at_comes_from_clock() {
        // テスト項目: 作成時刻には注入した時計の値が使われる
        // given (前提条件):
        let repo = InMemoryGazeRepository::with_clock(Arc::new(FixedClock::new(42_000)));

        // when (操作):
        repo.save_sample(&sample(1.0, 1.0)).await.unwrap();

        // then (期待する結果):
        let rows = repo.recent_samples(1).await.unwrap();
        assert_eq!(rows[0].created_at, Some(Timestamp::new(42_000)));
    }
}
