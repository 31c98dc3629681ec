//! Utilities shared by the gaze-relay binaries: logging setup and time helpers.

pub mod logger;
pub mod time;
