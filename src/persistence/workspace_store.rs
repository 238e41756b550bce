// Copyright 2025 Cowboy AI, LLC.

//! Storage of the workspace table

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

use super::errors::ReadModelError;
use super::unit_of_work::{query, WorkspaceTable, WorkspaceUnitOfWork};
use crate::workspace::{ContentStreamId, Workspace, WorkspaceName, WorkspaceStatus};

/// Authoritative storage of workspace rows
///
/// Lookups return rows ordered by workspace name.
#[async_trait]
pub trait WorkspaceStore: Send + Sync {
    /// Prepare storage; calling it again is harmless
    async fn set_up(&self) -> Result<(), ReadModelError>;

    /// Whether [`set_up`](Self::set_up) has completed
    async fn is_set_up(&self) -> Result<bool, ReadModelError>;

    /// Apply all mutations of a unit of work atomically
    async fn commit(&self, unit_of_work: WorkspaceUnitOfWork) -> Result<(), ReadModelError>;

    /// Delete every row
    async fn truncate(&self) -> Result<(), ReadModelError>;

    /// Row by workspace name
    async fn find_by_name(&self, name: &WorkspaceName) -> Result<Option<Workspace>, ReadModelError>;

    /// Row by current content stream id
    async fn find_by_current_content_stream_id(
        &self,
        content_stream_id: &ContentStreamId,
    ) -> Result<Option<Workspace>, ReadModelError>;

    /// Rows based on the given workspace
    async fn find_by_base_workspace(
        &self,
        base_workspace_name: &WorkspaceName,
    ) -> Result<Vec<Workspace>, ReadModelError>;

    /// Rows with the given status
    async fn find_by_status(&self, status: WorkspaceStatus)
        -> Result<Vec<Workspace>, ReadModelError>;

    /// Every row
    async fn find_all(&self) -> Result<Vec<Workspace>, ReadModelError>;
}

/// In-memory workspace table
///
/// A unit of work is applied under a single write lock.
#[derive(Debug, Default)]
pub struct InMemoryWorkspaceStore {
    table: RwLock<WorkspaceTable>,
    set_up: AtomicBool,
}

impl InMemoryWorkspaceStore {
    /// Create an empty store that still needs setup
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WorkspaceStore for InMemoryWorkspaceStore {
    async fn set_up(&self) -> Result<(), ReadModelError> {
        self.set_up.store(true, Ordering::Release);
        Ok(())
    }

    async fn is_set_up(&self) -> Result<bool, ReadModelError> {
        Ok(self.set_up.load(Ordering::Acquire))
    }

    async fn commit(&self, unit_of_work: WorkspaceUnitOfWork) -> Result<(), ReadModelError> {
        let mut table = self.table.write().await;
        let touched = unit_of_work.apply_to(&mut table);
        debug!(
            mutations = unit_of_work.mutations().len(),
            touched, "Committed workspace unit of work"
        );
        Ok(())
    }

    async fn truncate(&self) -> Result<(), ReadModelError> {
        self.table.write().await.clear();
        Ok(())
    }

    async fn find_by_name(&self, name: &WorkspaceName) -> Result<Option<Workspace>, ReadModelError> {
        Ok(self.table.read().await.get(name).cloned())
    }

    async fn find_by_current_content_stream_id(
        &self,
        content_stream_id: &ContentStreamId,
    ) -> Result<Option<Workspace>, ReadModelError> {
        Ok(query::by_current_content_stream_id(
            &*self.table.read().await,
            content_stream_id,
        ))
    }

    async fn find_by_base_workspace(
        &self,
        base_workspace_name: &WorkspaceName,
    ) -> Result<Vec<Workspace>, ReadModelError> {
        Ok(query::by_base_workspace(
            &*self.table.read().await,
            base_workspace_name,
        ))
    }

    async fn find_by_status(
        &self,
        status: WorkspaceStatus,
    ) -> Result<Vec<Workspace>, ReadModelError> {
        Ok(query::by_status(&*self.table.read().await, status))
    }

    async fn find_all(&self) -> Result<Vec<Workspace>, ReadModelError> {
        Ok(self.table.read().await.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::WorkspaceMutation;
    use crate::workspace::{WorkspaceDescription, WorkspaceTitle};

    #[tokio::test]
    async fn commit_and_query() {
        let store = InMemoryWorkspaceStore::new();
        assert!(!store.is_set_up().await.unwrap());
        store.set_up().await.unwrap();
        assert!(store.is_set_up().await.unwrap());

        let live = Workspace {
            workspace_name: WorkspaceName::for_live(),
            base_workspace_name: None,
            workspace_title: WorkspaceTitle::new("Live"),
            workspace_description: WorkspaceDescription::default(),
            workspace_owner: None,
            current_content_stream_id: ContentStreamId::create(),
            status: WorkspaceStatus::UpToDate,
        };
        store
            .commit(WorkspaceUnitOfWork::new().with(WorkspaceMutation::Insert(live.clone())))
            .await
            .unwrap();

        assert_eq!(
            store.find_by_name(&WorkspaceName::for_live()).await.unwrap(),
            Some(live.clone())
        );
        assert_eq!(
            store
                .find_by_current_content_stream_id(&live.current_content_stream_id)
                .await
                .unwrap(),
            Some(live)
        );
        assert_eq!(store.find_all().await.unwrap().len(), 1);

        store.truncate().await.unwrap();
        assert!(store.find_all().await.unwrap().is_empty());
    }
}
