//! Current-page state
//!
//! 最後に処理したページ変更を保持します。高頻度の視線データとロックを共有しないよう、
//! 独立した RwLock で保護しています。

use parking_lot::RwLock;

use crate::domain::{PageChange, PageState};

#[derive(Debug, Default)]
pub struct CurrentPageState {
    state: RwLock<PageState>,
}

impl CurrentPageState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, change: &PageChange) {
        let mut state = self.state.write();
        state.page = Some(change.page_id.clone());
        state.updated_at = Some(change.timestamp);
    }

    pub fn get(&self) -> PageState {
        self.state.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PageId, Timestamp};

    #[test]
    fn test_update_replaces_current_page() {
        // テスト項目: ページ変更のたびに現在ページが置き換わる
        // given (前提条件):
        let state = CurrentPageState::new();
        let first = PageChange::new(PageId::new("intro".to_string()).unwrap(), Timestamp::new(1));
        let second = PageChange::new(PageId::new("loans".to_string()).unwrap(), Timestamp::new(2));

        // when (操作):
        state.update(&first);
        state.update(&second);

        // then (期待する結果):
        let current = state.get();
        assert_eq!(current.page.as_ref().map(|p| p.as_str()), Some("loans"));
        assert_eq!(current.updated_at, Some(Timestamp::new(2)));
    }
}
