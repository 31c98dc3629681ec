//! Gaze telemetry relay server.
//!
//! Producers stream gaze samples and page changes over WebSocket. Samples are
//! coalesced to one per tick, then published to a message broker and broadcast
//! to every connected viewer; page changes skip coalescing.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
pub mod engine;
pub mod worker;
