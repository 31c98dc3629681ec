//! Domain layer: value objects, entities, and the interfaces the domain needs
//! from the outside world.
//!
//! Concrete implementations of the traits live in the infrastructure layer
//! (依存性の逆転).

pub mod broker;
pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use broker::{BrokerMessage, BrokerTransport, MessageBroker, PublishReceipt};
pub use entity::{PageChange, PageState, PositionSample, PurgeCounts, StoredSample};
pub use error::{BrokerError, DecodeError, RepositoryError, ValueObjectError};
pub use message_pusher::{BroadcastReport, MessagePusher, PusherChannel};
pub use repository::GazeRepository;
pub use value_object::{ConnectionId, PageId, SectionId, Timestamp};
