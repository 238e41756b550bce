// Copyright 2025 Cowboy AI, LLC.

//! Projection errors

use thiserror::Error;

use crate::infrastructure::CheckpointError;
use crate::persistence::ReadModelError;

/// Errors raised while applying events to a projection
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// The event type is not known to the projection
    #[error("Unsupported event {event_type}")]
    UnsupportedEvent {
        /// Type of the rejected event
        event_type: String,
    },

    /// The payload does not match the event type
    #[error("Malformed {event_type} event: {reason}")]
    MalformedEvent {
        /// Type of the rejected event
        event_type: String,
        /// Decoding failure
        reason: String,
    },

    /// Read model storage failed
    #[error(transparent)]
    ReadModel(#[from] ReadModelError),

    /// Checkpoint storage failed
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}

impl ProjectionError {
    /// Whether the event log and the projection disagree on the event schema
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(
            self,
            ProjectionError::UnsupportedEvent { .. } | ProjectionError::MalformedEvent { .. }
        )
    }
}
