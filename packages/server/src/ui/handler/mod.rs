//! HTTP and WebSocket handlers.

mod http;
mod websocket;

pub use http::{clear_history, health_check, page_status, recent_samples};
pub use websocket::websocket_handler;
