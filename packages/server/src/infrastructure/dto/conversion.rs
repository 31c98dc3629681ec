//! Conversion logic between DTOs and domain entities.

use crate::domain::{
    PageChange, PageId, PositionSample, SectionId, StoredSample, Timestamp, ValueObjectError,
};
use crate::infrastructure::dto::{http as http_dto, websocket as dto};

// ========================================
// DTO → Domain Entity
// ========================================

/// Optional labels never cost the sample: an unusable one is dropped.
fn optional_label<T>(
    value: Option<String>,
    parse: fn(String) -> Result<T, ValueObjectError>,
) -> Option<T> {
    let value = value?;
    match parse(value) {
        Ok(label) => Some(label),
        Err(e) => {
            tracing::debug!("Dropping label from gaze sample: {}", e);
            None
        }
    }
}

impl TryFrom<dto::GazeData> for PositionSample {
    type Error = ValueObjectError;

    fn try_from(dto: dto::GazeData) -> Result<Self, Self::Error> {
        PositionSample::new(
            dto.x,
            dto.y,
            Timestamp::new(dto.timestamp),
            optional_label(dto.section_id, SectionId::new),
            optional_label(dto.current_page, PageId::new),
        )
    }
}

impl TryFrom<dto::PageChangeData> for PageChange {
    type Error = ValueObjectError;

    fn try_from(dto: dto::PageChangeData) -> Result<Self, Self::Error> {
        Ok(PageChange::new(
            PageId::new(dto.current_page)?,
            Timestamp::new(dto.timestamp),
        ))
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&PositionSample> for dto::GazeData {
    fn from(model: &PositionSample) -> Self {
        Self {
            x: model.x,
            y: model.y,
            timestamp: model.timestamp.value(),
            section_id: model.section_id.as_ref().map(|s| s.as_str().to_string()),
            current_page: model.page_id.as_ref().map(|p| p.as_str().to_string()),
        }
    }
}

impl From<&PageChange> for dto::PageChangeData {
    fn from(model: &PageChange) -> Self {
        Self {
            current_page: model.page_id.as_str().to_string(),
            timestamp: model.timestamp.value(),
        }
    }
}

impl From<StoredSample> for http_dto::StoredSampleDto {
    fn from(model: StoredSample) -> Self {
        Self {
            id: model.id,
            x: model.sample.x,
            y: model.sample.y,
            timestamp: model.sample.timestamp.value(),
            section_id: model.sample.section_id.map(SectionId::into_string),
            current_page: model.sample.page_id.map(PageId::into_string),
            created_at: model
                .created_at
                .and_then(|t| gaze_relay_shared::time::timestamp_to_rfc3339(t.value())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dto_gaze_data_to_domain() {
        // テスト項目: DTO の GazeData がドメインエンティティに変換される
        // given (前提条件):
        let dto_sample = dto::GazeData {
            x: 10.0,
            y: 20.0,
            timestamp: 5,
            section_id: Some("hero".to_string()),
            current_page: None,
        };

        // when (操作):
        let sample = PositionSample::try_from(dto_sample).unwrap();

        // then (期待する結果):
        assert_eq!(sample.x, 10.0);
        assert_eq!(sample.y, 20.0);
        assert_eq!(sample.timestamp, Timestamp::new(5));
        assert_eq!(sample.section_id, Some(SectionId::new("hero".to_string()).unwrap()));
        assert!(sample.page_id.is_none());
    }

    #[test]
    fn test_dto_gaze_data_with_unusable_labels_keeps_sample() {
        // テスト項目: 空白や 100 文字を超えるラベルは捨てられるが、サンプル自体は変換される
        // given (前提条件):
        let dto_sample = dto::GazeData {
            x: 1.0,
            y: 1.0,
            timestamp: 1,
            section_id: Some(" ".to_string()),
            current_page: Some("p".repeat(101)),
        };

        // when (操作):
        let sample = PositionSample::try_from(dto_sample).unwrap();

        // then (期待する結果):
        assert_eq!(sample.x, 1.0);
        assert_eq!(sample.timestamp, Timestamp::new(1));
        assert!(sample.section_id.is_none());
        assert!(sample.page_id.is_none());
    }

    #[test]
    fn test_domain_page_change_to_dto() {
        // テスト項目: ドメインエンティティの PageChange が DTO に変換される
        // given (前提条件):
        let change = PageChange::new(PageId::new("loans".to_string()).unwrap(), Timestamp::new(2000));

        // when (操作):
        let dto_change = dto::PageChangeData::from(&change);

        // then (期待する結果):
        assert_eq!(dto_change.current_page, "loans");
        assert_eq!(dto_change.timestamp, 2000);
    }

    #[test]
    fn test_stored_sample_to_http_dto() {
        // テスト項目: 保存済みサンプルが HTTP DTO に変換され、作成時刻が RFC 3339 になる
        // given (前提条件):
        let stored = StoredSample {
            id: 7,
            sample: PositionSample::new(
                1.0,
                2.0,
                Timestamp::new(3),
                None,
                Some(PageId::new("intro".to_string()).unwrap()),
            )
            .unwrap(),
            created_at: Some(Timestamp::new(1672531200000)),
        };

        // when (操作):
        let dto_row = http_dto::StoredSampleDto::from(stored);

        // then (期待する結果):
        assert_eq!(dto_row.id, 7);
        assert_eq!(dto_row.current_page.as_deref(), Some("intro"));
        assert!(dto_row.section_id.is_none());
        assert_eq!(dto_row.created_at.as_deref(), Some("2023-01-01T00:00:00.000Z"));
    }
}
