// Copyright 2025 Cowboy AI, LLC.

//! # CIM Content Repository
//!
//! The versioning and variation core of a content repository.
//!
//! This crate provides two subsystems:
//! - **Dimension space**: content dimensions, the allowed dimension subspace and the
//!   inter-dimensional variation graph answering how two dimension space points relate
//!   (same, specialization, generalization or peer) and which generalization a point
//!   falls back to first
//! - **Workspaces**: the workspace read model maintained by an event-driven projection,
//!   tracking which content stream each workspace points at and whether it is up to date
//!   with its base
//!
//! ## Design Principles
//!
//! 1. **Frozen graph**: the variation graph is computed once and shared read-only
//! 2. **Deterministic weights**: dimension priority is threaded through every comparison
//! 3. **Closed events**: workspace events are a sum type, matched exhaustively
//! 4. **Atomic units of work**: one event commits one unit of work to the read model
//! 5. **Best-effort caching**: the runtime cache only ever saves latency

#![warn(missing_docs)]

pub mod config;
mod content_repository;
pub mod dimension;
pub mod dimension_space;
mod errors;
pub mod events;
pub mod infrastructure;
pub mod persistence;
pub mod projections;
pub mod workspace;

pub use config::{ConfigError, ContentRepositoryConfig};
pub use content_repository::ContentRepository;
pub use dimension::{
    ConfigurationBasedContentDimensionSource, ContentDimension, ContentDimensionId,
    ContentDimensionSource, ContentDimensionValue, DimensionError,
};
pub use dimension_space::{
    ContentDimensionZookeeper, ContentSubgraphVariationWeight, DimensionSpaceError,
    DimensionSpacePoint, DimensionSpacePointSet, InterDimensionalVariationGraph, VariantType,
    WeightedDimensionSpacePoint,
};
pub use errors::{ContentRepositoryError, ContentRepositoryResult};
pub use events::{EventEnvelope, SequenceNumber};
pub use infrastructure::{CatchUp, CatchUpStats, CheckpointManager, NatsClient, NatsConfig};
pub use persistence::{InMemoryWorkspaceStore, ReadModelError, WorkspaceStore};
pub use projections::{Projection, ProjectionError, ProjectionStatus, WorkspaceProjection};
pub use workspace::{
    ContentStreamId, Workspace, WorkspaceError, WorkspaceEvent, WorkspaceFinder, WorkspaceName,
    WorkspaceRuntimeCache, WorkspaceStatus,
};
