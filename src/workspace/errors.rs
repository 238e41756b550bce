// Copyright 2025 Cowboy AI, LLC.

//! Workspace domain errors

use thiserror::Error;

/// Errors of the workspace domain
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspaceError {
    /// No workspace with this name is known to the read model
    #[error("Workspace {0} does not exist")]
    WorkspaceDoesNotExist(String),

    /// The workspace name violates the naming rules
    #[error("Invalid workspace name {name:?}: {reason}")]
    InvalidWorkspaceName {
        /// Offending name
        name: String,
        /// Violated rule
        reason: String,
    },

    /// The content stream id is blank or padded with whitespace
    #[error("Invalid content stream id {0:?}")]
    InvalidContentStreamId(String),
}
