//! Repository trait 定義
//!
//! 永続化ストレージへのインターフェース。ライブ経路はページ変更の保存と
//! 保持期間の掃除だけを呼び出し、視線データの保存はブローカーのコンシューマー側の契約です。

use std::time::Duration;

use async_trait::async_trait;

use super::{
    entity::{PageChange, PositionSample, PurgeCounts, StoredSample},
    error::RepositoryError,
};

/// Gaze Repository trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GazeRepository: Send + Sync {
    /// 視線データを 1 件保存
    async fn save_sample(&self, sample: &PositionSample) -> Result<(), RepositoryError>;

    /// ページ変更履歴を 1 件保存
    async fn save_page_change(&self, change: &PageChange) -> Result<(), RepositoryError>;

    /// 新しい順に最大 `limit` 件の視線データを取得
    async fn recent_samples(&self, limit: usize) -> Result<Vec<StoredSample>, RepositoryError>;

    /// 全ての視線データとページ変更履歴を削除
    async fn clear_all(&self) -> Result<PurgeCounts, RepositoryError>;

    /// `retention` より古い行を削除
    async fn delete_older_than(&self, retention: Duration) -> Result<PurgeCounts, RepositoryError>;
}
