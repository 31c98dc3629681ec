//! UseCase: 保持期間を過ぎたデータの削除
//!
//! 失敗してもリトライはせず、次回の掃除で再度実行されます。

use std::{sync::Arc, time::Duration};

use crate::domain::{GazeRepository, PurgeCounts};

use super::error::HistoryError;

pub struct SweepRetentionUseCase {
    repository: Arc<dyn GazeRepository>,
    retention: Duration,
}

impl SweepRetentionUseCase {
    pub fn new(repository: Arc<dyn GazeRepository>, retention: Duration) -> Self {
        Self {
            repository,
            retention,
        }
    }

    pub async fn execute(&self) -> Result<PurgeCounts, HistoryError> {
        let counts = self.repository.delete_older_than(self.retention).await?;
        if counts.samples > 0 || counts.page_changes > 0 {
            tracing::info!(
                "Retention sweep removed {} gaze row(s) and {} page change row(s)",
                counts.samples,
                counts.page_changes
            );
        } else {
            tracing::debug!("Retention sweep found nothing to remove");
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RepositoryError, repository::MockGazeRepository};
    use mockall::predicate::eq;

    const SEVEN_DAYS: Duration = Duration::from_secs(7 * 24 * 60 * 60);

    #[tokio::test]
    async fn test_sweep_uses_configured_retention() {
        // テスト項目: 設定した保持期間でストレージに削除を依頼する
        // given (前提条件):
        let mut repository = MockGazeRepository::new();
        repository
            .expect_delete_older_than()
            .with(eq(SEVEN_DAYS))
            .times(1)
            .returning(|_| {
                Ok(PurgeCounts {
                    samples: 12,
                    page_changes: 3,
                })
            });
        let usecase = SweepRetentionUseCase::new(Arc::new(repository), SEVEN_DAYS);

        // when (操作):
        let counts = usecase.execute().await.unwrap();

        // then (期待する結果):
        assert_eq!(counts.samples, 12);
        assert_eq!(counts.page_changes, 3);
    }

    #[tokio::test]
    async fn test_sweep_failure_is_returned() {
        // テスト項目: 削除に失敗した場合はエラーが返り、パニックしない
        // given (前提条件):
        let mut repository = MockGazeRepository::new();
        repository
            .expect_delete_older_than()
            .returning(|_| Err(RepositoryError::Backend("database is down".to_string())));
        let usecase = SweepRetentionUseCase::new(Arc::new(repository), SEVEN_DAYS);

        // when (操作):
        let result = usecase.execute().await;

        // then (期待する結果):
        assert!(matches!(result, Err(HistoryError::Storage(_))));
    }
}
