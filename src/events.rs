// Copyright 2025 Cowboy AI, LLC.

//! Event envelopes as delivered by the event store
//!
//! Events arrive wrapped in an envelope carrying their position in the stream. The
//! payload stays raw JSON until a projection decodes it, so projections can skip event
//! types they do not handle without knowing their shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::workspace::WorkspaceEvent;

/// Position of an event in the stream
///
/// Sequence numbers start at 1; [`SequenceNumber::none`] means nothing was processed yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceNumber(pub u64);

impl SequenceNumber {
    /// Create a sequence number with the given value
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Before the first event
    pub fn none() -> Self {
        Self(0)
    }

    /// The following position
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Get the raw value
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An event with its stream metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    /// Position in the stream
    pub sequence_number: SequenceNumber,
    /// Name of the event type
    pub event_type: String,
    /// Raw event payload
    pub payload: serde_json::Value,
    /// When the event was recorded
    pub recorded_at: DateTime<Utc>,
    /// Correlation, causation and other free-form metadata
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl EventEnvelope {
    /// Wrap a workspace event
    pub fn new(
        sequence_number: SequenceNumber,
        event: &WorkspaceEvent,
    ) -> Result<Self, serde_json::Error> {
        let (event_type, payload) = event.to_parts()?;
        Ok(Self {
            sequence_number,
            event_type,
            payload,
            recorded_at: Utc::now(),
            metadata: serde_json::Map::new(),
        })
    }

    /// Wrap a raw event of any type
    pub fn raw(
        sequence_number: SequenceNumber,
        event_type: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            sequence_number,
            event_type: event_type.into(),
            payload,
            recorded_at: Utc::now(),
            metadata: serde_json::Map::new(),
        }
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Decode the payload as a workspace event
    pub fn decode(&self) -> Result<WorkspaceEvent, serde_json::Error> {
        WorkspaceEvent::from_parts(&self.event_type, &self.payload)
    }
}
