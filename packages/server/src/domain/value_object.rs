//! Value Objects
//!
//! 不変で、値によって等価性が判断されるドメインの基本型。

use std::fmt;

use uuid::Uuid;

use super::error::ValueObjectError;

/// `VARCHAR(100)` columns in `gaze_data` / `page_changes`
pub const MAX_LABEL_LENGTH: usize = 100;

/// Unix timestamp (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Identity of one live WebSocket connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// 新しい接続 ID を生成する（UUID v4）
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn validate_label(field: &'static str, value: &str) -> Result<(), ValueObjectError> {
    if value.trim().is_empty() {
        return Err(ValueObjectError::Empty(field));
    }
    let actual = value.chars().count();
    if actual > MAX_LABEL_LENGTH {
        return Err(ValueObjectError::TooLong {
            field,
            max: MAX_LABEL_LENGTH,
            actual,
        });
    }
    Ok(())
}

/// Page (navigation context) label
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageId(String);

impl PageId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_label("page id", &value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for PageId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Section label within a page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SectionId(String);

impl SectionId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_label("section id", &value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for SectionId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_id_accepts_normal_label() {
        // テスト項目: 通常のページ ID が生成できる
        // given (前提条件):
        let value = "intro".to_string();

        // when (操作):
        let result = PageId::new(value);

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "intro");
    }

    #[test]
    fn test_page_id_rejects_blank_label() {
        // テスト項目: 空白のみのページ ID はエラーになる
        // given (前提条件):
        let value = "   ".to_string();

        // when (操作):
        let result = PageId::new(value);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::Empty("page id")));
    }

    #[test]
    fn test_section_id_length_boundary() {
        // テスト項目: セクション ID は 100 文字まで許容され、101 文字でエラーになる
        // given (前提条件):
        let exactly_max = "a".repeat(MAX_LABEL_LENGTH);
        let over_max = "a".repeat(MAX_LABEL_LENGTH + 1);

        // when (操作):
        let ok = SectionId::new(exactly_max);
        let err = SectionId::new(over_max);

        // then (期待する結果):
        assert!(ok.is_ok());
        assert_eq!(
            err,
            Err(ValueObjectError::TooLong {
                field: "section id",
                max: MAX_LABEL_LENGTH,
                actual: MAX_LABEL_LENGTH + 1,
            })
        );
    }

    #[test]
    fn test_connection_ids_are_unique() {
        // テスト項目: 生成される接続 ID は毎回異なる
        // given (前提条件):

        // when (操作):
        let a = ConnectionId::generate();
        let b = ConnectionId::generate();

        // then (期待する結果):
        assert_ne!(a, b);
    }
}
