// Copyright 2025 Cowboy AI, LLC.

//! Catch-up: feeding a projection from an ordered event stream
//!
//! Events at or below the projection's checkpoint are skipped, so delivering the same
//! stream twice is harmless. The checkpoint moves after every event, including events
//! the projection does not handle. The first failing event stops the run; it is recorded
//! on the checkpoint and the checkpoint stays in front of it.

use futures::{pin_mut, Stream, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use super::projection_checkpoint::{CheckpointError, CheckpointManager};
use crate::events::{EventEnvelope, SequenceNumber};
use crate::projections::{Projection, ProjectionError};

/// Statistics collected during a catch-up run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatchUpStats {
    /// Events applied to the projection
    pub events_applied: u64,
    /// Events of types the projection ignores
    pub events_skipped: u64,
    /// Events at or below the checkpoint
    pub events_already_processed: u64,
    /// Checkpoint after the run
    pub checkpoint: SequenceNumber,
    /// Total duration of the run in milliseconds
    pub duration_ms: u64,
}

/// Drives one projection through an event stream
pub struct CatchUp<P: Projection> {
    projection: Arc<P>,
    checkpoints: CheckpointManager,
}

impl<P: Projection> CatchUp<P> {
    /// Create a driver for `projection`, storing progress with `checkpoints`
    pub fn new(projection: Arc<P>, checkpoints: CheckpointManager) -> Self {
        Self {
            projection,
            checkpoints,
        }
    }

    /// The driven projection
    pub fn projection(&self) -> &Arc<P> {
        &self.projection
    }

    /// Apply every new event of `events`
    pub async fn run<S>(&self, events: S) -> Result<CatchUpStats, ProjectionError>
    where
        S: Stream<Item = EventEnvelope> + Send,
    {
        let started = Instant::now();
        let projection_id = self.projection.projection_id().to_string();
        let mut checkpoint = self.projection.checkpoint().await?;
        let mut events_processed = match self.checkpoints.get_checkpoint(&projection_id).await {
            Ok(existing) => existing.events_processed,
            Err(CheckpointError::NotFound(_)) => 0,
            Err(e) => return Err(e.into()),
        };
        let mut stats = CatchUpStats::default();

        self.projection.mark_stale().await;
        let result = async {
            pin_mut!(events);
            while let Some(envelope) = events.next().await {
                if envelope.sequence_number <= checkpoint {
                    stats.events_already_processed += 1;
                    continue;
                }

                if self.projection.can_handle(&envelope) {
                    if let Err(e) = self.projection.apply(&envelope).await {
                        error!(
                            projection_id = %projection_id,
                            sequence_number = %envelope.sequence_number,
                            error = %e,
                            "Catch-up stopped"
                        );
                        self.checkpoints
                            .record_error(
                                &projection_id,
                                &format!("event {}: {e}", envelope.sequence_number),
                            )
                            .await?;
                        return Err(e);
                    }
                    stats.events_applied += 1;
                    events_processed += 1;
                } else {
                    stats.events_skipped += 1;
                }

                checkpoint = envelope.sequence_number;
                self.checkpoints
                    .update_progress(&projection_id, checkpoint, events_processed)
                    .await?;
            }
            Ok::<(), ProjectionError>(())
        }
        .await;
        self.projection.after_catch_up().await;
        result?;

        stats.checkpoint = checkpoint;
        stats.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            projection_id = %projection_id,
            applied = stats.events_applied,
            skipped = stats.events_skipped,
            already_processed = stats.events_already_processed,
            checkpoint = %stats.checkpoint,
            "Catch-up finished"
        );
        Ok(stats)
    }
}
