// Copyright 2025 Cowboy AI, LLC.

//! Units of work against the workspace table
//!
//! The projection turns every event into one [`WorkspaceUnitOfWork`]. Stores apply it as a
//! whole, so readers never see a row's new content stream next to its old status, nor a
//! changed workspace next to dependents that still show their previous status.

use std::collections::BTreeMap;
use tracing::trace;

use crate::workspace::{
    ContentStreamId, Workspace, WorkspaceDescription, WorkspaceName, WorkspaceStatus,
    WorkspaceTitle,
};

/// The workspace table: one row per workspace, keyed by name
pub type WorkspaceTable = BTreeMap<WorkspaceName, Workspace>;

/// One keyed write against the workspace table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceMutation {
    /// Insert a row, replacing any row of the same name
    Insert(Workspace),
    /// Replace title and description
    UpdateMetadata {
        /// Row key
        workspace_name: WorkspaceName,
        /// New title
        workspace_title: WorkspaceTitle,
        /// New description
        workspace_description: WorkspaceDescription,
    },
    /// Replace the owner
    SetOwner {
        /// Row key
        workspace_name: WorkspaceName,
        /// New owner
        workspace_owner: Option<String>,
    },
    /// Move a workspace onto another base
    SetBase {
        /// Row key
        workspace_name: WorkspaceName,
        /// New base
        base_workspace_name: WorkspaceName,
        /// Content stream forked from the new base
        content_stream_id: ContentStreamId,
    },
    /// Switch the current content stream
    SetContentStream {
        /// Row key
        workspace_name: WorkspaceName,
        /// New content stream
        content_stream_id: ContentStreamId,
    },
    /// Set the status of one workspace; root workspaces stay up to date
    SetStatus {
        /// Row key
        workspace_name: WorkspaceName,
        /// New status
        status: WorkspaceStatus,
    },
    /// Mark every direct dependent of a workspace outdated
    MarkDependentsOutdated {
        /// The workspace whose dependents are affected
        base_workspace_name: WorkspaceName,
    },
    /// Delete a row
    Delete {
        /// Row key
        workspace_name: WorkspaceName,
    },
}

/// Ordered mutations committed together
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceUnitOfWork {
    mutations: Vec<WorkspaceMutation>,
}

impl WorkspaceUnitOfWork {
    /// An empty unit of work
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mutation
    pub fn with(mut self, mutation: WorkspaceMutation) -> Self {
        self.mutations.push(mutation);
        self
    }

    /// The mutations in application order
    pub fn mutations(&self) -> &[WorkspaceMutation] {
        &self.mutations
    }

    /// Whether there is nothing to apply
    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    /// Apply every mutation in order, returning the number of rows touched
    ///
    /// Updates of missing rows touch nothing, matching keyed updates in a table.
    pub fn apply_to(&self, table: &mut WorkspaceTable) -> usize {
        self.mutations
            .iter()
            .map(|mutation| apply_mutation(table, mutation))
            .sum()
    }
}

fn apply_mutation(table: &mut WorkspaceTable, mutation: &WorkspaceMutation) -> usize {
    match mutation {
        WorkspaceMutation::Insert(workspace) => {
            let mut workspace = workspace.clone();
            if workspace.is_root_workspace() {
                workspace.status = WorkspaceStatus::UpToDate;
            }
            table.insert(workspace.workspace_name.clone(), workspace);
            1
        }
        WorkspaceMutation::UpdateMetadata {
            workspace_name,
            workspace_title,
            workspace_description,
        } => update_row(table, workspace_name, |row| {
            row.workspace_title = workspace_title.clone();
            row.workspace_description = workspace_description.clone();
        }),
        WorkspaceMutation::SetOwner {
            workspace_name,
            workspace_owner,
        } => update_row(table, workspace_name, |row| {
            row.workspace_owner = workspace_owner.clone();
        }),
        WorkspaceMutation::SetBase {
            workspace_name,
            base_workspace_name,
            content_stream_id,
        } => update_row(table, workspace_name, |row| {
            row.base_workspace_name = Some(base_workspace_name.clone());
            row.current_content_stream_id = content_stream_id.clone();
        }),
        WorkspaceMutation::SetContentStream {
            workspace_name,
            content_stream_id,
        } => update_row(table, workspace_name, |row| {
            row.current_content_stream_id = content_stream_id.clone();
        }),
        WorkspaceMutation::SetStatus {
            workspace_name,
            status,
        } => update_row(table, workspace_name, |row| {
            if !row.is_root_workspace() {
                row.status = *status;
            }
        }),
        WorkspaceMutation::MarkDependentsOutdated {
            base_workspace_name,
        } => {
            let mut touched = 0;
            for row in table.values_mut() {
                if row.base_workspace_name.as_ref() == Some(base_workspace_name) {
                    row.status = WorkspaceStatus::Outdated;
                    touched += 1;
                }
            }
            touched
        }
        WorkspaceMutation::Delete { workspace_name } => {
            usize::from(table.remove(workspace_name).is_some())
        }
    }
}

fn update_row(
    table: &mut WorkspaceTable,
    workspace_name: &WorkspaceName,
    update: impl FnOnce(&mut Workspace),
) -> usize {
    match table.get_mut(workspace_name) {
        Some(row) => {
            update(row);
            1
        }
        None => {
            trace!(workspace = %workspace_name, "Keyed update matched no workspace");
            0
        }
    }
}

/// Row lookups shared by the store implementations
pub(crate) mod query {
    use super::WorkspaceTable;
    use crate::workspace::{ContentStreamId, Workspace, WorkspaceName, WorkspaceStatus};

    pub(crate) fn by_current_content_stream_id(
        table: &WorkspaceTable,
        content_stream_id: &ContentStreamId,
    ) -> Option<Workspace> {
        table
            .values()
            .find(|row| &row.current_content_stream_id == content_stream_id)
            .cloned()
    }

    pub(crate) fn by_base_workspace(
        table: &WorkspaceTable,
        base_workspace_name: &WorkspaceName,
    ) -> Vec<Workspace> {
        table
            .values()
            .filter(|row| row.base_workspace_name.as_ref() == Some(base_workspace_name))
            .cloned()
            .collect()
    }

    pub(crate) fn by_status(table: &WorkspaceTable, status: WorkspaceStatus) -> Vec<Workspace> {
        table
            .values()
            .filter(|row| row.status == status)
            .cloned()
            .collect()
    }
}
