// Copyright 2025 Cowboy AI, LLC.

//! Infrastructure layer
//!
//! - NATS client and JetStream-backed stores
//! - Projection checkpoints
//! - Catch-up of projections from an event stream

/// Driving projections through ordered event streams
pub mod catch_up;
pub mod nats_client;
/// Projection checkpoint storage for fault-tolerant event processing
pub mod projection_checkpoint;

pub use catch_up::{CatchUp, CatchUpStats};
pub use nats_client::{NatsClient, NatsConfig, NatsError};
pub use projection_checkpoint::{
    CheckpointError, CheckpointManager, CheckpointStore, EventPosition, InMemoryCheckpointStore,
    JetStreamCheckpointStore, ProjectionCheckpoint,
};
