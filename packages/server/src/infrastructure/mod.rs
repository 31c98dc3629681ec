//! Infrastructure layer: concrete state holders, the connection registry,
//! broker publishing, storage backends and wire DTOs.

pub mod broker;
pub mod dto;
pub mod message_pusher;
pub mod page_state;
pub mod repository;
pub mod snapshot;
