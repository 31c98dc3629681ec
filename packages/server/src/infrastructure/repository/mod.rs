//! GazeRepository implementations.

mod inmemory;
#[cfg(feature = "postgres")]
mod postgres;

pub use inmemory::InMemoryGazeRepository;
#[cfg(feature = "postgres")]
pub use postgres::PostgresGazeRepository;
