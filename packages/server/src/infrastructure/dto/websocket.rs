//! WebSocket envelope DTOs.
//!
//! Every message on a viewer connection (and every broker record) is a JSON
//! envelope `{"type": ..., "data": ...}`.

use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

use crate::domain::{DecodeError, PageChange, PositionSample};

/// Envelope discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageType {
    GazeData,
    PageChange,
    ClientCount,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::GazeData => "gazeData",
            MessageType::PageChange => "pageChange",
            MessageType::ClientCount => "clientCount",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "gazeData" => Some(MessageType::GazeData),
            "pageChange" => Some(MessageType::PageChange),
            "clientCount" => Some(MessageType::ClientCount),
            _ => None,
        }
    }
}

/// `gazeData` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GazeData {
    pub x: f64,
    pub y: f64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    #[serde(default, alias = "pageId", skip_serializing_if = "Option::is_none")]
    pub current_page: Option<String>,
}

/// `pageChange` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageChangeData {
    #[serde(alias = "pageId")]
    pub current_page: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: i64,
}

/// `clientCount` payload (server → viewers only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCountData {
    pub count: usize,
    /// Unix seconds
    pub timestamp: i64,
}

/// Outbound envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Envelope {
    GazeData(GazeData),
    PageChange(PageChangeData),
    ClientCount(ClientCountData),
}

impl Envelope {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Decoded inbound message
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    PositionSample(PositionSample),
    PageChange(PageChange),
    /// Unrecognized `type`; logged and ignored by the caller
    Unknown(String),
}

/// Envelope as read off the wire, before the payload is interpreted
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    r#type: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Decode one inbound text frame.
///
/// The discriminant is inspected first; only recognized types have their
/// payload parsed.
pub fn decode_inbound(text: &str) -> Result<InboundMessage, DecodeError> {
    let raw: RawEnvelope = serde_json::from_str(text).map_err(DecodeError::MalformedEnvelope)?;

    match MessageType::from_wire(&raw.r#type) {
        Some(MessageType::GazeData) => {
            let kind = MessageType::GazeData.as_str();
            let dto: GazeData = serde_json::from_value(raw.data)
                .map_err(|source| DecodeError::MalformedPayload { kind, source })?;
            let sample = PositionSample::try_from(dto)
                .map_err(|source| DecodeError::InvalidPayload { kind, source })?;
            Ok(InboundMessage::PositionSample(sample))
        }
        Some(MessageType::PageChange) => {
            let kind = MessageType::PageChange.as_str();
            let dto: PageChangeData = serde_json::from_value(raw.data)
                .map_err(|source| DecodeError::MalformedPayload { kind, source })?;
            let change = PageChange::try_from(dto)
                .map_err(|source| DecodeError::InvalidPayload { kind, source })?;
            Ok(InboundMessage::PageChange(change))
        }
        // clientCount is server-originated; producers sending it are ignored like any other type
        Some(MessageType::ClientCount) | None => Ok(InboundMessage::Unknown(raw.r#type)),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Accept a millisecond timestamp as a JSON integer, float, or decimal string.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Integer(value) => Ok(value),
        RawTimestamp::Float(value) if value.is_finite() => Ok(value.trunc() as i64),
        RawTimestamp::Float(value) => Err(D::Error::custom(format!(
            "timestamp must be finite, got {}",
            value
        ))),
        RawTimestamp::Text(text) => text.trim().parse::<i64>().map_err(|e| {
            D::Error::custom(format!("invalid timestamp string '{}': {}", text, e))
        }),
    }
}
