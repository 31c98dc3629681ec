//! Data Transfer Objects (DTOs) for the gaze relay.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket / broker envelope DTOs and inbound decoding
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
