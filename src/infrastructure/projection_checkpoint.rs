// Copyright 2025 Cowboy AI, LLC.

//! Projection checkpoint storage for fault-tolerant event processing
//!
//! A checkpoint records the last sequence number a projection committed, so catch-up can
//! resume after it instead of reprocessing the stream.

use async_nats::jetstream::kv::Store as KvStore;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use crate::events::SequenceNumber;

/// Errors that can occur during checkpoint operations
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// NATS communication error
    #[error("NATS error: {0}")]
    Nats(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Checkpoint not found
    #[error("Checkpoint not found: {0}")]
    NotFound(String),
}

/// A checkpoint storing projection progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionCheckpoint {
    /// Unique identifier for the projection
    pub projection_id: String,
    /// Current position in the event stream
    pub position: EventPosition,
    /// When this checkpoint was last updated
    pub last_processed_at: DateTime<Utc>,
    /// Total number of events processed
    pub events_processed: u64,
    /// Number of errors encountered
    pub errors: u32,
    /// Description of the last error (if any)
    pub last_error: Option<String>,
}

/// Position in an event stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPosition {
    /// Nothing processed yet
    Beginning,
    /// Everything up to and including this sequence number is processed
    Sequence(SequenceNumber),
}

impl EventPosition {
    /// The last processed sequence number
    pub fn sequence_number(self) -> SequenceNumber {
        match self {
            EventPosition::Beginning => SequenceNumber::none(),
            EventPosition::Sequence(sequence_number) => sequence_number,
        }
    }
}

/// Trait for checkpoint storage implementations
#[async_trait::async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Save or update a checkpoint
    async fn save_checkpoint(&self, checkpoint: &ProjectionCheckpoint)
        -> Result<(), CheckpointError>;

    /// Load a checkpoint by projection ID
    async fn load_checkpoint(
        &self,
        projection_id: &str,
    ) -> Result<Option<ProjectionCheckpoint>, CheckpointError>;

    /// Delete a checkpoint
    async fn delete_checkpoint(&self, projection_id: &str) -> Result<(), CheckpointError>;
}

fn checkpoint_key(projection_id: &str) -> String {
    format!("checkpoint.{projection_id}")
}

/// JetStream-based checkpoint storage
pub struct JetStreamCheckpointStore {
    kv_store: Arc<KvStore>,
}

impl JetStreamCheckpointStore {
    /// Create a new JetStream checkpoint store
    pub async fn new(client: async_nats::Client, bucket_name: &str) -> Result<Self, CheckpointError> {
        let jetstream = async_nats::jetstream::new(client);

        let kv_store = jetstream
            .create_key_value(async_nats::jetstream::kv::Config {
                bucket: bucket_name.to_string(),
                description: "Projection checkpoints".to_string(),
                history: 5,
                max_bytes: 10_000_000,
                storage: async_nats::jetstream::stream::StorageType::File,
                ..Default::default()
            })
            .await
            .map_err(|e| CheckpointError::Nats(e.to_string()))?;

        Ok(Self {
            kv_store: Arc::new(kv_store),
        })
    }
}

#[async_trait::async_trait]
impl CheckpointStore for JetStreamCheckpointStore {
    async fn save_checkpoint(
        &self,
        checkpoint: &ProjectionCheckpoint,
    ) -> Result<(), CheckpointError> {
        let value = serde_json::to_vec(checkpoint)?;

        self.kv_store
            .put(checkpoint_key(&checkpoint.projection_id), Bytes::from(value))
            .await
            .map_err(|e| CheckpointError::Nats(e.to_string()))?;

        debug!(
            projection_id = %checkpoint.projection_id,
            position = ?checkpoint.position,
            "Saved checkpoint"
        );

        Ok(())
    }

    async fn load_checkpoint(
        &self,
        projection_id: &str,
    ) -> Result<Option<ProjectionCheckpoint>, CheckpointError> {
        match self.kv_store.get(checkpoint_key(projection_id)).await {
            Ok(Some(entry)) => Ok(Some(serde_json::from_slice(&entry)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(CheckpointError::Nats(e.to_string())),
        }
    }

    async fn delete_checkpoint(&self, projection_id: &str) -> Result<(), CheckpointError> {
        self.kv_store
            .delete(checkpoint_key(projection_id))
            .await
            .map_err(|e| CheckpointError::Nats(e.to_string()))?;
        Ok(())
    }
}

/// In-memory checkpoint storage for testing
#[derive(Default)]
pub struct InMemoryCheckpointStore {
    checkpoints: RwLock<HashMap<String, ProjectionCheckpoint>>,
}

impl InMemoryCheckpointStore {
    /// Create a new in-memory checkpoint store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl CheckpointStore for InMemoryCheckpointStore {
    async fn save_checkpoint(
        &self,
        checkpoint: &ProjectionCheckpoint,
    ) -> Result<(), CheckpointError> {
        self.checkpoints
            .write()
            .await
            .insert(checkpoint.projection_id.clone(), checkpoint.clone());
        Ok(())
    }

    async fn load_checkpoint(
        &self,
        projection_id: &str,
    ) -> Result<Option<ProjectionCheckpoint>, CheckpointError> {
        Ok(self.checkpoints.read().await.get(projection_id).cloned())
    }

    async fn delete_checkpoint(&self, projection_id: &str) -> Result<(), CheckpointError> {
        self.checkpoints.write().await.remove(projection_id);
        Ok(())
    }
}

/// Manager for checkpoint operations with convenience methods
#[derive(Clone)]
pub struct CheckpointManager {
    store: Arc<dyn CheckpointStore>,
}

impl CheckpointManager {
    /// Create a new checkpoint manager
    pub fn new(store: Arc<dyn CheckpointStore>) -> Self {
        Self { store }
    }

    /// A manager over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryCheckpointStore::new()))
    }

    /// Record that everything up to `sequence_number` is processed
    ///
    /// Error counters of an existing checkpoint are kept.
    pub async fn update_progress(
        &self,
        projection_id: &str,
        sequence_number: SequenceNumber,
        events_processed: u64,
    ) -> Result<(), CheckpointError> {
        let previous = self.store.load_checkpoint(projection_id).await?;
        let checkpoint = ProjectionCheckpoint {
            projection_id: projection_id.to_string(),
            position: EventPosition::Sequence(sequence_number),
            last_processed_at: Utc::now(),
            events_processed,
            errors: previous.as_ref().map_or(0, |c| c.errors),
            last_error: previous.and_then(|c| c.last_error),
        };

        self.store.save_checkpoint(&checkpoint).await
    }

    /// Record an error for a projection
    ///
    /// A projection that never committed gets a checkpoint at the beginning.
    pub async fn record_error(&self, projection_id: &str, error: &str) -> Result<(), CheckpointError> {
        let mut checkpoint = self
            .store
            .load_checkpoint(projection_id)
            .await?
            .unwrap_or_else(|| ProjectionCheckpoint {
                projection_id: projection_id.to_string(),
                position: EventPosition::Beginning,
                last_processed_at: Utc::now(),
                events_processed: 0,
                errors: 0,
                last_error: None,
            });

        checkpoint.errors += 1;
        checkpoint.last_error = Some(error.to_string());
        checkpoint.last_processed_at = Utc::now();

        self.store.save_checkpoint(&checkpoint).await
    }

    /// Reset a projection by deleting its checkpoint
    pub async fn reset_projection(&self, projection_id: &str) -> Result<(), CheckpointError> {
        self.store.delete_checkpoint(projection_id).await
    }

    /// Get the current position of a projection
    pub async fn get_position(
        &self,
        projection_id: &str,
    ) -> Result<Option<EventPosition>, CheckpointError> {
        Ok(self
            .store
            .load_checkpoint(projection_id)
            .await?
            .map(|c| c.position))
    }

    /// Load the full checkpoint of a projection
    pub async fn get_checkpoint(
        &self,
        projection_id: &str,
    ) -> Result<ProjectionCheckpoint, CheckpointError> {
        self.store
            .load_checkpoint(projection_id)
            .await?
            .ok_or_else(|| CheckpointError::NotFound(projection_id.to_string()))
    }
}
