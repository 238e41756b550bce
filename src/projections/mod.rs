// Copyright 2025 Cowboy AI, LLC.

//! Read model projections
//!
//! Projections are read models updated by handling events in stream order. They are
//! driven by [`CatchUp`](crate::infrastructure::CatchUp), which owns the loop and the
//! checkpoint bookkeeping.

mod errors;
mod workspace_projection;

pub use errors::ProjectionError;
pub use workspace_projection::WorkspaceProjection;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::events::{EventEnvelope, SequenceNumber};

/// Health of a projection's storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectionStatus {
    /// Ready to apply events
    Ok,
    /// [`Projection::set_up`] must run first
    SetupRequired(String),
    /// Storage is unusable
    Error(String),
}

/// Trait for all projections
///
/// Applying is single-writer; queries through [`Projection::state`] may run concurrently.
#[async_trait]
pub trait Projection: Send + Sync {
    /// The query API handed out to readers
    type State;

    /// Identifier used for checkpoints
    fn projection_id(&self) -> &str;

    /// Prepare storage; idempotent
    async fn set_up(&self) -> Result<(), ProjectionError>;

    /// Check whether storage is ready
    async fn status(&self) -> ProjectionStatus;

    /// Whether the projection consumes events of this type
    fn can_handle(&self, envelope: &EventEnvelope) -> bool;

    /// Apply one event
    async fn apply(&self, envelope: &EventEnvelope) -> Result<(), ProjectionError>;

    /// Drop the read model and rewind the checkpoint
    async fn reset(&self) -> Result<(), ProjectionError>;

    /// The last committed sequence number
    async fn checkpoint(&self) -> Result<SequenceNumber, ProjectionError>;

    /// Stop trusting memoized reads
    async fn mark_stale(&self);

    /// Called once a catch-up run has finished
    async fn after_catch_up(&self);

    /// Get the query API
    fn state(&self) -> Self::State;
}
