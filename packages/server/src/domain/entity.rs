//! Entities
//!
//! 視線データ・ページ変更イベントなど、ドメインの中心となるデータ。

use super::{
    error::ValueObjectError,
    value_object::{PageId, SectionId, Timestamp},
};

/// One gaze/pointer position sample.
///
/// Within one coalescing window only the most recently written sample survives.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSample {
    pub x: f64,
    pub y: f64,
    pub timestamp: Timestamp,
    pub section_id: Option<SectionId>,
    pub page_id: Option<PageId>,
}

impl PositionSample {
    pub fn new(
        x: f64,
        y: f64,
        timestamp: Timestamp,
        section_id: Option<SectionId>,
        page_id: Option<PageId>,
    ) -> Result<Self, ValueObjectError> {
        if !x.is_finite() {
            return Err(ValueObjectError::NonFiniteCoordinate("x"));
        }
        if !y.is_finite() {
            return Err(ValueObjectError::NonFiniteCoordinate("y"));
        }
        Ok(Self {
            x,
            y,
            timestamp,
            section_id,
            page_id,
        })
    }
}

/// Discrete navigation event; never coalesced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageChange {
    pub page_id: PageId,
    pub timestamp: Timestamp,
}

impl PageChange {
    pub fn new(page_id: PageId, timestamp: Timestamp) -> Self {
        Self { page_id, timestamp }
    }
}

/// Most recent page reported by any producer. Empty until the first page change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageState {
    pub page: Option<PageId>,
    pub updated_at: Option<Timestamp>,
}

/// A persisted sample row, as read back from storage
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSample {
    pub id: i64,
    pub sample: PositionSample,
    /// Insertion time (milliseconds), when the backend recorded one
    pub created_at: Option<Timestamp>,
}

/// Rows removed by a clear or retention sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeCounts {
    pub samples: u64,
    pub page_changes: u64,
}
