//! Domain error types.

use thiserror::Error;

/// Value object construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// Label is empty (after trimming)
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// Label exceeds the storage column width
    #[error("{field} must be at most {max} characters (got {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    /// Coordinate is NaN or infinite
    #[error("coordinate {0} must be finite")]
    NonFiniteCoordinate(&'static str),
}

/// Errors surfaced by the broker publisher
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrokerError {
    /// The batching task is gone (shutdown in progress)
    #[error("broker publisher is closed")]
    Closed,

    /// The transport rejected or failed to deliver the batch
    #[error("broker transport failed: {0}")]
    Transport(String),
}

/// Errors surfaced by the storage contract
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Inbound message decoding errors
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Not a `{type, data}` object at all
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(#[source] serde_json::Error),

    /// Envelope is fine but `data` does not match the declared type
    #[error("malformed {kind} payload: {source}")]
    MalformedPayload {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Payload parsed but carries an invalid value
    #[error("invalid {kind} payload: {source}")]
    InvalidPayload {
        kind: &'static str,
        #[source]
        source: ValueObjectError,
    },
}
