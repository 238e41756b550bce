// Copyright 2025 Cowboy AI, LLC.

//! The workspace read model

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::errors::WorkspaceError;

const MAX_WORKSPACE_NAME_LENGTH: usize = 255;
const PERSONAL_WORKSPACE_PREFIX: &str = "user-";

/// Unique name of a workspace
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(try_from = "String", into = "String")]
pub struct WorkspaceName(String);

impl WorkspaceName {
    /// Validate and wrap a workspace name
    ///
    /// Names are lowercase ASCII letters, digits and dashes, start with a letter or digit
    /// and are at most 255 characters long.
    pub fn new(name: impl Into<String>) -> Result<Self, WorkspaceError> {
        let name = name.into();
        let invalid = |reason: &str| WorkspaceError::InvalidWorkspaceName {
            name: name.clone(),
            reason: reason.to_string(),
        };

        let Some(first) = name.chars().next() else {
            return Err(invalid("must not be empty"));
        };
        if name.len() > MAX_WORKSPACE_NAME_LENGTH {
            return Err(invalid("must be at most 255 characters long"));
        }
        if !(first.is_ascii_lowercase() || first.is_ascii_digit()) {
            return Err(invalid("must start with a lowercase letter or a digit"));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(invalid("may only contain lowercase letters, digits and dashes"));
        }
        Ok(Self(name))
    }

    /// The live workspace every site is published to
    pub fn for_live() -> Self {
        Self("live".to_string())
    }

    /// Whether this is the live workspace
    pub fn is_live(&self) -> bool {
        self.0 == "live"
    }

    /// The raw name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for WorkspaceName {
    type Error = WorkspaceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WorkspaceName> for String {
    fn from(name: WorkspaceName) -> Self {
        name.0
    }
}

impl FromStr for WorkspaceName {
    type Err = WorkspaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for WorkspaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a content stream, the change set a workspace points to
///
/// Any non-blank string is accepted; generated ids are UUID v4 strings.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(try_from = "String", into = "String")]
pub struct ContentStreamId(String);

impl ContentStreamId {
    /// Validate and wrap an existing id
    pub fn new(id: impl Into<String>) -> Result<Self, WorkspaceError> {
        let id = id.into();
        if id.trim().is_empty() || id.trim() != id {
            return Err(WorkspaceError::InvalidContentStreamId(id));
        }
        Ok(Self(id))
    }

    /// Generate a fresh id
    pub fn create() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ContentStreamId {
    type Error = WorkspaceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContentStreamId> for String {
    fn from(id: ContentStreamId) -> Self {
        id.0
    }
}

impl FromStr for ContentStreamId {
    type Err = WorkspaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for ContentStreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human readable workspace title
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct WorkspaceTitle(pub String);

impl WorkspaceTitle {
    /// Wrap a title
    pub fn new(title: impl Into<String>) -> Self {
        Self(title.into())
    }
}

impl fmt::Display for WorkspaceTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Free text workspace description
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct WorkspaceDescription(pub String);

impl WorkspaceDescription {
    /// Wrap a description
    pub fn new(description: impl Into<String>) -> Self {
        Self(description.into())
    }
}

impl fmt::Display for WorkspaceDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a workspace is in sync with its base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkspaceStatus {
    /// Based on the current content stream of its base
    UpToDate,
    /// The base changed since the last rebase
    Outdated,
    /// A rebase failed and needs manual resolution
    OutdatedConflict,
}

impl WorkspaceStatus {
    /// The persisted name
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkspaceStatus::UpToDate => "UP_TO_DATE",
            WorkspaceStatus::Outdated => "OUTDATED",
            WorkspaceStatus::OutdatedConflict => "OUTDATED_CONFLICT",
        }
    }
}

impl fmt::Display for WorkspaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the workspace read model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    /// Unique workspace name
    pub workspace_name: WorkspaceName,
    /// The workspace this one publishes into, `None` for root workspaces
    pub base_workspace_name: Option<WorkspaceName>,
    /// Title shown to editors
    pub workspace_title: WorkspaceTitle,
    /// Description shown to editors
    pub workspace_description: WorkspaceDescription,
    /// Owning user, if any
    pub workspace_owner: Option<String>,
    /// The content stream currently backing the workspace
    pub current_content_stream_id: ContentStreamId,
    /// Sync state relative to the base workspace
    pub status: WorkspaceStatus,
}

impl Workspace {
    /// Whether this workspace has no base
    pub fn is_root_workspace(&self) -> bool {
        self.base_workspace_name.is_none()
    }

    /// Whether this is a user's personal workspace
    pub fn is_personal_workspace(&self) -> bool {
        self.workspace_name
            .as_str()
            .starts_with(PERSONAL_WORKSPACE_PREFIX)
    }

    /// Whether this workspace is not up to date with its base
    pub fn is_outdated(&self) -> bool {
        self.status != WorkspaceStatus::UpToDate
    }
}
