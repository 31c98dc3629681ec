//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::RepositoryError;

/// 送信用エンベロープを JSON にできなかった
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to encode {kind} envelope: {reason}")]
pub struct EncodeError {
    pub kind: &'static str,
    pub reason: String,
}

impl EncodeError {
    pub fn new(kind: &'static str, source: serde_json::Error) -> Self {
        Self {
            kind,
            reason: source.to_string(),
        }
    }
}

/// 保存済みデータの参照・削除に失敗した
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error(transparent)]
    Storage(#[from] RepositoryError),
}
