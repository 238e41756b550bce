// Copyright 2025 Cowboy AI, LLC.

//! Workspace events
//!
//! Every change of a workspace is recorded as one of these facts. The projection in
//! [`crate::projections`] folds them into the [`Workspace`](super::Workspace) read model.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::model::{ContentStreamId, WorkspaceDescription, WorkspaceName, WorkspaceTitle};
use crate::dimension_space::DimensionSpacePoint;

/// A node selected for a partial publish or discard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeIdToPublishOrDiscard {
    /// Content stream the node was changed in
    pub content_stream_id: ContentStreamId,
    /// The changed node aggregate
    pub node_aggregate_id: String,
    /// The variant that was changed
    pub dimension_space_point: DimensionSpacePoint,
}

/// A command that could not be reapplied while rebasing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommandThatFailedDuringRebase {
    /// Position of the command in the original content stream
    pub sequence_number: u64,
    /// Name of the failed command
    pub command: String,
    /// Why reapplying failed
    pub error_message: String,
}

/// A regular workspace was created on top of a base workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceWasCreated {
    /// The new workspace
    pub workspace_name: WorkspaceName,
    /// Its base
    pub base_workspace_name: WorkspaceName,
    /// Title
    pub workspace_title: WorkspaceTitle,
    /// Description
    pub workspace_description: WorkspaceDescription,
    /// The content stream forked for the workspace
    pub new_content_stream_id: ContentStreamId,
    /// Owning user
    #[serde(default)]
    pub workspace_owner: Option<String>,
}

/// A root workspace was created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootWorkspaceWasCreated {
    /// The new workspace
    pub workspace_name: WorkspaceName,
    /// Title
    pub workspace_title: WorkspaceTitle,
    /// Description
    pub workspace_description: WorkspaceDescription,
    /// The root content stream
    pub new_content_stream_id: ContentStreamId,
}

/// Title and description changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceWasRenamed {
    /// The renamed workspace
    pub workspace_name: WorkspaceName,
    /// New title
    pub workspace_title: WorkspaceTitle,
    /// New description
    pub workspace_description: WorkspaceDescription,
}

/// All changes of a workspace were dropped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceWasDiscarded {
    /// The discarded workspace
    pub workspace_name: WorkspaceName,
    /// Fresh content stream forked from the base
    pub new_content_stream_id: ContentStreamId,
    /// The dropped content stream
    pub previous_content_stream_id: ContentStreamId,
}

/// Some changes of a workspace were dropped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceWasPartiallyDiscarded {
    /// The workspace
    pub workspace_name: WorkspaceName,
    /// Content stream holding the remaining changes
    pub new_content_stream_id: ContentStreamId,
    /// The replaced content stream
    pub previous_content_stream_id: ContentStreamId,
    /// Nodes whose changes were dropped
    #[serde(default)]
    pub discarded_nodes: Vec<NodeIdToPublishOrDiscard>,
}

/// All changes of a workspace were published into its target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceWasPublished {
    /// The publishing workspace
    pub source_workspace_name: WorkspaceName,
    /// The workspace that received the changes
    pub target_workspace_name: WorkspaceName,
    /// Fresh content stream of the source
    pub new_source_content_stream_id: ContentStreamId,
    /// The published content stream
    pub previous_source_content_stream_id: ContentStreamId,
}

/// Some changes of a workspace were published into its target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceWasPartiallyPublished {
    /// The publishing workspace
    pub source_workspace_name: WorkspaceName,
    /// The workspace that received the changes
    pub target_workspace_name: WorkspaceName,
    /// Content stream holding the unpublished remainder
    pub new_source_content_stream_id: ContentStreamId,
    /// The replaced content stream
    pub previous_source_content_stream_id: ContentStreamId,
    /// Nodes whose changes were published
    #[serde(default)]
    pub published_nodes: Vec<NodeIdToPublishOrDiscard>,
}

/// A workspace was rebased onto the current state of its base
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceWasRebased {
    /// The rebased workspace
    pub workspace_name: WorkspaceName,
    /// Content stream with the reapplied changes
    pub new_content_stream_id: ContentStreamId,
    /// The replaced content stream
    pub previous_content_stream_id: ContentStreamId,
}

/// Rebasing a workspace failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceRebaseFailed {
    /// The workspace that could not be rebased
    pub workspace_name: WorkspaceName,
    /// The abandoned candidate content stream
    pub candidate_content_stream_id: ContentStreamId,
    /// The content stream the workspace keeps
    pub previous_source_content_stream_id: ContentStreamId,
    /// Commands that failed to reapply
    #[serde(default)]
    pub errors: Vec<CommandThatFailedDuringRebase>,
}

/// A workspace was removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceWasRemoved {
    /// The removed workspace
    pub workspace_name: WorkspaceName,
}

/// A workspace got a new owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceOwnerWasChanged {
    /// The workspace
    pub workspace_name: WorkspaceName,
    /// The new owner, `None` to unassign
    pub new_workspace_owner: Option<String>,
}

/// A workspace was moved onto another base
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceBaseWorkspaceWasChanged {
    /// The workspace
    pub workspace_name: WorkspaceName,
    /// Its new base
    pub base_workspace_name: WorkspaceName,
    /// Content stream forked from the new base
    pub new_content_stream_id: ContentStreamId,
}

/// Every event the workspace projection understands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum WorkspaceEvent {
    /// See [`WorkspaceWasCreated`]
    WorkspaceWasCreated(WorkspaceWasCreated),
    /// See [`RootWorkspaceWasCreated`]
    RootWorkspaceWasCreated(RootWorkspaceWasCreated),
    /// See [`WorkspaceWasRenamed`]
    WorkspaceWasRenamed(WorkspaceWasRenamed),
    /// See [`WorkspaceWasDiscarded`]
    WorkspaceWasDiscarded(WorkspaceWasDiscarded),
    /// See [`WorkspaceWasPartiallyDiscarded`]
    WorkspaceWasPartiallyDiscarded(WorkspaceWasPartiallyDiscarded),
    /// See [`WorkspaceWasPublished`]
    WorkspaceWasPublished(WorkspaceWasPublished),
    /// See [`WorkspaceWasPartiallyPublished`]
    WorkspaceWasPartiallyPublished(WorkspaceWasPartiallyPublished),
    /// See [`WorkspaceWasRebased`]
    WorkspaceWasRebased(WorkspaceWasRebased),
    /// See [`WorkspaceRebaseFailed`]
    WorkspaceRebaseFailed(WorkspaceRebaseFailed),
    /// See [`WorkspaceWasRemoved`]
    WorkspaceWasRemoved(WorkspaceWasRemoved),
    /// See [`WorkspaceOwnerWasChanged`]
    WorkspaceOwnerWasChanged(WorkspaceOwnerWasChanged),
    /// See [`WorkspaceBaseWorkspaceWasChanged`]
    WorkspaceBaseWorkspaceWasChanged(WorkspaceBaseWorkspaceWasChanged),
}

impl WorkspaceEvent {
    /// Every event type name, in declaration order
    pub const EVENT_TYPES: [&'static str; 12] = [
        "WorkspaceWasCreated",
        "RootWorkspaceWasCreated",
        "WorkspaceWasRenamed",
        "WorkspaceWasDiscarded",
        "WorkspaceWasPartiallyDiscarded",
        "WorkspaceWasPublished",
        "WorkspaceWasPartiallyPublished",
        "WorkspaceWasRebased",
        "WorkspaceRebaseFailed",
        "WorkspaceWasRemoved",
        "WorkspaceOwnerWasChanged",
        "WorkspaceBaseWorkspaceWasChanged",
    ];

    /// The event type name, matching the serialized `type` tag
    pub fn event_type(&self) -> &'static str {
        match self {
            WorkspaceEvent::WorkspaceWasCreated(_) => "WorkspaceWasCreated",
            WorkspaceEvent::RootWorkspaceWasCreated(_) => "RootWorkspaceWasCreated",
            WorkspaceEvent::WorkspaceWasRenamed(_) => "WorkspaceWasRenamed",
            WorkspaceEvent::WorkspaceWasDiscarded(_) => "WorkspaceWasDiscarded",
            WorkspaceEvent::WorkspaceWasPartiallyDiscarded(_) => "WorkspaceWasPartiallyDiscarded",
            WorkspaceEvent::WorkspaceWasPublished(_) => "WorkspaceWasPublished",
            WorkspaceEvent::WorkspaceWasPartiallyPublished(_) => "WorkspaceWasPartiallyPublished",
            WorkspaceEvent::WorkspaceWasRebased(_) => "WorkspaceWasRebased",
            WorkspaceEvent::WorkspaceRebaseFailed(_) => "WorkspaceRebaseFailed",
            WorkspaceEvent::WorkspaceWasRemoved(_) => "WorkspaceWasRemoved",
            WorkspaceEvent::WorkspaceOwnerWasChanged(_) => "WorkspaceOwnerWasChanged",
            WorkspaceEvent::WorkspaceBaseWorkspaceWasChanged(_) => {
                "WorkspaceBaseWorkspaceWasChanged"
            }
        }
    }

    /// The workspace the event is primarily about
    pub fn workspace_name(&self) -> &WorkspaceName {
        match self {
            WorkspaceEvent::WorkspaceWasCreated(e) => &e.workspace_name,
            WorkspaceEvent::RootWorkspaceWasCreated(e) => &e.workspace_name,
            WorkspaceEvent::WorkspaceWasRenamed(e) => &e.workspace_name,
            WorkspaceEvent::WorkspaceWasDiscarded(e) => &e.workspace_name,
            WorkspaceEvent::WorkspaceWasPartiallyDiscarded(e) => &e.workspace_name,
            WorkspaceEvent::WorkspaceWasPublished(e) => &e.source_workspace_name,
            WorkspaceEvent::WorkspaceWasPartiallyPublished(e) => &e.source_workspace_name,
            WorkspaceEvent::WorkspaceWasRebased(e) => &e.workspace_name,
            WorkspaceEvent::WorkspaceRebaseFailed(e) => &e.workspace_name,
            WorkspaceEvent::WorkspaceWasRemoved(e) => &e.workspace_name,
            WorkspaceEvent::WorkspaceOwnerWasChanged(e) => &e.workspace_name,
            WorkspaceEvent::WorkspaceBaseWorkspaceWasChanged(e) => &e.workspace_name,
        }
    }

    /// Split into `(type, payload)` for an envelope
    pub fn to_parts(&self) -> Result<(String, serde_json::Value), serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        let payload = value
            .get_mut("payload")
            .map(serde_json::Value::take)
            .unwrap_or(serde_json::Value::Null);
        Ok((self.event_type().to_string(), payload))
    }

    /// Rebuild an event from its `(type, payload)` parts
    pub fn from_parts(
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        serde_json::from_value(serde_json::json!({
            "type": event_type,
            "payload": payload,
        }))
    }
}
