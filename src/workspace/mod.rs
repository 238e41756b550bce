// Copyright 2025 Cowboy AI, LLC.

//! Workspaces and their content streams
//!
//! A workspace is a named, branchable change set. It always points at one content
//! stream and knows whether that stream is still based on the current state of its base
//! workspace.
//!
//! ```mermaid
//! stateDiagram-v2
//!     [*] --> UP_TO_DATE: created
//!     UP_TO_DATE --> OUTDATED: base changed
//!     OUTDATED --> UP_TO_DATE: rebased / published
//!     OUTDATED --> OUTDATED_CONFLICT: rebase failed
//!     OUTDATED_CONFLICT --> UP_TO_DATE: rebased
//! ```

mod errors;
mod events;
mod finder;
mod model;
mod runtime_cache;

pub use errors::WorkspaceError;
pub use events::{
    CommandThatFailedDuringRebase, NodeIdToPublishOrDiscard, RootWorkspaceWasCreated,
    WorkspaceBaseWorkspaceWasChanged, WorkspaceEvent, WorkspaceOwnerWasChanged,
    WorkspaceRebaseFailed, WorkspaceWasCreated, WorkspaceWasDiscarded,
    WorkspaceWasPartiallyDiscarded, WorkspaceWasPartiallyPublished, WorkspaceWasPublished,
    WorkspaceWasRebased, WorkspaceWasRemoved, WorkspaceWasRenamed,
};
pub use finder::WorkspaceFinder;
pub use model::{
    ContentStreamId, Workspace, WorkspaceDescription, WorkspaceName, WorkspaceStatus,
    WorkspaceTitle,
};
pub use runtime_cache::{WorkspaceRuntimeCache, DEFAULT_WORKSPACE_CACHE_CAPACITY};
