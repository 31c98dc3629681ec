//! UseCase: 保存済み視線データの取得

use std::sync::Arc;

use crate::domain::{GazeRepository, StoredSample};

use super::error::HistoryError;

/// `limit` 未指定時の件数
pub const DEFAULT_RECENT_LIMIT: usize = 100;
/// `limit` の上限
pub const MAX_RECENT_LIMIT: usize = 1000;

pub struct GetRecentSamplesUseCase {
    repository: Arc<dyn GazeRepository>,
}

impl GetRecentSamplesUseCase {
    pub fn new(repository: Arc<dyn GazeRepository>) -> Self {
        Self { repository }
    }

    /// 新しい順に視線データを取得する
    ///
    /// `limit` が未指定または 0 の場合は既定値、上限を超える場合は上限に丸める。
    pub async fn execute(&self, limit: Option<usize>) -> Result<Vec<StoredSample>, HistoryError> {
        let limit = match limit {
            None | Some(0) => DEFAULT_RECENT_LIMIT,
            Some(n) => n.min(MAX_RECENT_LIMIT),
        };
        Ok(self.repository.recent_samples(limit).await?)
    }
}
