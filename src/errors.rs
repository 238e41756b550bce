// Copyright 2025 Cowboy AI, LLC.

//! Error types for content repository operations
//!
//! Every subsystem owns its own error enum; [`ContentRepositoryError`] gathers them for
//! callers that work across subsystems.

use thiserror::Error;

use crate::config::ConfigError;
use crate::dimension::DimensionError;
use crate::dimension_space::DimensionSpaceError;
use crate::infrastructure::{CheckpointError, NatsError};
use crate::persistence::ReadModelError;
use crate::projections::ProjectionError;
use crate::workspace::WorkspaceError;

/// Errors that can occur in content repository operations
#[derive(Debug, Error)]
pub enum ContentRepositoryError {
    /// Dimension configuration is invalid
    #[error(transparent)]
    Dimension(#[from] DimensionError),

    /// Dimension space lookup or weight arithmetic failed
    #[error(transparent)]
    DimensionSpace(#[from] DimensionSpaceError),

    /// Workspace lookup failed
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// Read model storage failed
    #[error(transparent)]
    ReadModel(#[from] ReadModelError),

    /// Applying an event failed
    #[error(transparent)]
    Projection(#[from] ProjectionError),

    /// Checkpoint storage failed
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    /// NATS is unreachable
    #[error(transparent)]
    Nats(#[from] NatsError),

    /// Repository configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for content repository operations
pub type ContentRepositoryResult<T> = Result<T, ContentRepositoryError>;

impl ContentRepositoryError {
    /// Check if a caller asked for something outside the known domain
    pub fn is_not_found(&self) -> bool {
        match self {
            ContentRepositoryError::DimensionSpace(err) => err.is_not_found(),
            ContentRepositoryError::Workspace(WorkspaceError::WorkspaceDoesNotExist(_)) => true,
            ContentRepositoryError::ReadModel(ReadModelError::NotFound(_)) => true,
            _ => false,
        }
    }

    /// Check if the repository must not start
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            ContentRepositoryError::Dimension(_)
                | ContentRepositoryError::Config(_)
                | ContentRepositoryError::DimensionSpace(DimensionSpaceError::Configuration(_))
        )
    }

    /// Check if a catch-up must stop instead of retrying
    ///
    /// Schema mismatches between the event log and the projection never heal by retrying.
    pub fn is_fatal_for_catch_up(&self) -> bool {
        match self {
            ContentRepositoryError::Projection(err) => err.is_schema_mismatch(),
            ContentRepositoryError::ReadModel(ReadModelError::SetupRequired(_)) => true,
            _ => false,
        }
    }
}
