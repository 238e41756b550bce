// Copyright 2025 Cowboy AI, LLC.

//! Read model store errors

/// Errors raised by workspace read model stores
///
/// All of these are transient from the projection's point of view: they propagate to the
/// catch-up driver, which records them and stops.
#[derive(Debug, thiserror::Error)]
pub enum ReadModelError {
    /// Model not found
    #[error("Read model not found: {0}")]
    NotFound(String),

    /// The store has not been set up yet
    #[error("Read model store requires setup: {0}")]
    SetupRequired(String),

    /// Storage error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// NATS error
    #[error("NATS error: {0}")]
    NatsError(String),
}
