// Copyright 2025 Cowboy AI, LLC.

//! Read-side queries over the workspace read model

use std::sync::Arc;

use super::errors::WorkspaceError;
use super::model::{ContentStreamId, Workspace, WorkspaceName, WorkspaceStatus};
use super::runtime_cache::WorkspaceRuntimeCache;
use crate::errors::ContentRepositoryResult;
use crate::persistence::{ReadModelError, WorkspaceStore};

/// Query API of the workspace projection
///
/// Single-row lookups go through the runtime cache first; every row read from the store
/// is offered back to the cache.
#[derive(Clone)]
pub struct WorkspaceFinder {
    store: Arc<dyn WorkspaceStore>,
    cache: Arc<WorkspaceRuntimeCache>,
}

impl WorkspaceFinder {
    /// Create a finder over a store and its cache
    pub fn new(store: Arc<dyn WorkspaceStore>, cache: Arc<WorkspaceRuntimeCache>) -> Self {
        Self { store, cache }
    }

    /// The workspace with the given name
    pub async fn find_one_by_name(
        &self,
        name: &WorkspaceName,
    ) -> Result<Option<Workspace>, ReadModelError> {
        if let Some(workspace) = self.cache.get_workspace_by_name(name).await {
            return Ok(Some(workspace));
        }
        let workspace = self.store.find_by_name(name).await?;
        if let Some(workspace) = &workspace {
            self.cache.set_workspace(workspace).await;
        }
        Ok(workspace)
    }

    /// The workspace with the given name, failing if there is none
    pub async fn get_by_name(&self, name: &WorkspaceName) -> ContentRepositoryResult<Workspace> {
        self.find_one_by_name(name)
            .await?
            .ok_or_else(|| WorkspaceError::WorkspaceDoesNotExist(name.to_string()).into())
    }

    /// The workspace currently backed by the given content stream
    pub async fn find_one_by_current_content_stream_id(
        &self,
        content_stream_id: &ContentStreamId,
    ) -> Result<Option<Workspace>, ReadModelError> {
        if let Some(workspace) = self
            .cache
            .get_by_current_content_stream_id(content_stream_id)
            .await
        {
            return Ok(Some(workspace));
        }
        let workspace = self
            .store
            .find_by_current_content_stream_id(content_stream_id)
            .await?;
        if let Some(workspace) = &workspace {
            self.cache.set_workspace(workspace).await;
        }
        Ok(workspace)
    }

    /// Direct dependents of a workspace
    pub async fn find_by_base_workspace(
        &self,
        base_workspace_name: &WorkspaceName,
    ) -> Result<Vec<Workspace>, ReadModelError> {
        let workspaces = self.store.find_by_base_workspace(base_workspace_name).await?;
        self.remember(&workspaces).await;
        Ok(workspaces)
    }

    /// Workspaces whose base changed since their last rebase
    ///
    /// Workspaces in conflict are not included.
    pub async fn find_outdated(&self) -> Result<Vec<Workspace>, ReadModelError> {
        let workspaces = self.store.find_by_status(WorkspaceStatus::Outdated).await?;
        self.remember(&workspaces).await;
        Ok(workspaces)
    }

    /// Every workspace
    pub async fn find_all(&self) -> Result<Vec<Workspace>, ReadModelError> {
        let workspaces = self.store.find_all().await?;
        self.remember(&workspaces).await;
        Ok(workspaces)
    }

    async fn remember(&self, workspaces: &[Workspace]) {
        for workspace in workspaces {
            self.cache.set_workspace(workspace).await;
        }
    }
}

impl std::fmt::Debug for WorkspaceFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkspaceFinder")
            .field("cache_enabled", &self.cache.is_enabled())
            .finish_non_exhaustive()
    }
}
