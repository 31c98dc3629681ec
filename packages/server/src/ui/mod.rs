//! axum server: the WebSocket ingestion endpoint and the HTTP API.

mod handler;
mod server;
pub mod signal;
pub mod state;

pub use server::{Server, router};
