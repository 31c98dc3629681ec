//! UseCase: 保存済みデータの全削除

use std::sync::Arc;

use crate::domain::{GazeRepository, PurgeCounts};

use super::error::HistoryError;

pub struct ClearHistoryUseCase {
    repository: Arc<dyn GazeRepository>,
}

impl ClearHistoryUseCase {
    pub fn new(repository: Arc<dyn GazeRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> Result<PurgeCounts, HistoryError> {
        let counts = self.repository.clear_all().await?;
        tracing::info!(
            "Cleared {} gaze row(s) and {} page change row(s)",
            counts.samples,
            counts.page_changes
        );
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{PositionSample, Timestamp},
        infrastructure::repository::InMemoryGazeRepository,
    };

    #[tokio::test]
    async fn test_clear_returns_deleted_counts() {
        // テスト項目: 削除した行数が返り、以後は何も取得できない
        // given (前提条件):
        let repository = Arc::new(InMemoryGazeRepository::new());
        let sample = PositionSample::new(1.0, 2.0, Timestamp::new(3), None, None).unwrap();
        repository.save_sample(&sample).await.unwrap();
        let usecase = ClearHistoryUseCase::new(repository.clone());

        // when (操作):
        let counts = usecase.execute().await.unwrap();

        // then (期待する結果):
        assert_eq!(counts.samples, 1);
        assert_eq!(counts.page_changes, 0);
        assert!(repository.recent_samples(10).await.unwrap().is_empty());
    }
}
