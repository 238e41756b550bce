// Copyright 2025 Cowboy AI, LLC.

//! Best-effort memoization of workspace lookups
//!
//! The cache never decides anything: a miss falls through to the store. The projection
//! disables (and flushes) it before applying events, catch-up enables it again once the
//! read model is current.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::trace;

use super::model::{ContentStreamId, Workspace, WorkspaceName};

/// Default number of workspaces kept per index
pub const DEFAULT_WORKSPACE_CACHE_CAPACITY: usize = 256;

/// Bounded cache of workspaces by name and by current content stream id
#[derive(Debug)]
pub struct WorkspaceRuntimeCache {
    enabled: AtomicBool,
    by_name: RwLock<LruCache<WorkspaceName, Workspace>>,
    by_content_stream_id: RwLock<LruCache<ContentStreamId, Workspace>>,
}

impl Default for WorkspaceRuntimeCache {
    fn default() -> Self {
        Self::new(DEFAULT_WORKSPACE_CACHE_CAPACITY)
    }
}

impl WorkspaceRuntimeCache {
    /// Create an enabled cache holding up to `capacity` workspaces per index
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            enabled: AtomicBool::new(true),
            by_name: RwLock::new(LruCache::new(capacity)),
            by_content_stream_id: RwLock::new(LruCache::new(capacity)),
        }
    }

    /// Whether lookups are currently served
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Stop serving lookups and drop every entry
    pub async fn disable_cache(&self) {
        self.enabled.store(false, Ordering::Release);
        self.by_name.write().await.clear();
        self.by_content_stream_id.write().await.clear();
        trace!("Workspace runtime cache disabled");
    }

    /// Serve lookups again; entries are repopulated lazily
    pub fn enable_cache(&self) {
        self.enabled.store(true, Ordering::Release);
        trace!("Workspace runtime cache enabled");
    }

    /// Cached workspace by name
    pub async fn get_workspace_by_name(&self, name: &WorkspaceName) -> Option<Workspace> {
        if !self.is_enabled() {
            return None;
        }
        self.by_name.write().await.get(name).cloned()
    }

    /// Cached workspace by current content stream id
    pub async fn get_by_current_content_stream_id(
        &self,
        content_stream_id: &ContentStreamId,
    ) -> Option<Workspace> {
        if !self.is_enabled() {
            return None;
        }
        self.by_content_stream_id
            .write()
            .await
            .get(content_stream_id)
            .cloned()
    }

    /// Remember a workspace under both indices; ignored while disabled
    pub async fn set_workspace(&self, workspace: &Workspace) {
        if !self.is_enabled() {
            return;
        }
        self.by_name
            .write()
            .await
            .put(workspace.workspace_name.clone(), workspace.clone());
        self.by_content_stream_id
            .write()
            .await
            .put(workspace.current_content_stream_id.clone(), workspace.clone());
    }

    /// Number of workspaces cached by name
    pub async fn len(&self) -> usize {
        self.by_name.read().await.len()
    }

    /// Whether nothing is cached
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::{WorkspaceDescription, WorkspaceStatus, WorkspaceTitle};

    fn workspace(name: &str) -> Workspace {
        Workspace {
            workspace_name: WorkspaceName::new(name).unwrap(),
            base_workspace_name: None,
            workspace_title: WorkspaceTitle::new(name),
            workspace_description: WorkspaceDescription::default(),
            workspace_owner: None,
            current_content_stream_id: ContentStreamId::create(),
            status: WorkspaceStatus::UpToDate,
        }
    }

    #[tokio::test]
    async fn lookups_hit_both_indices() {
        let cache = WorkspaceRuntimeCache::default();
        let live = workspace("live");
        cache.set_workspace(&live).await;

        assert_eq!(cache.get_workspace_by_name(&live.workspace_name).await, Some(live.clone()));
        assert_eq!(
            cache
                .get_by_current_content_stream_id(&live.current_content_stream_id)
                .await,
            Some(live)
        );
    }

    #[tokio::test]
    async fn disabling_flushes_and_ignores_writes() {
        let cache = WorkspaceRuntimeCache::default();
        let live = workspace("live");
        cache.set_workspace(&live).await;

        cache.disable_cache().await;
        assert!(cache.is_empty().await);
        cache.set_workspace(&live).await;
        assert!(cache.get_workspace_by_name(&live.workspace_name).await.is_none());

        cache.enable_cache();
        assert!(cache.get_workspace_by_name(&live.workspace_name).await.is_none());
        cache.set_workspace(&live).await;
        assert!(cache.get_workspace_by_name(&live.workspace_name).await.is_some());
    }

    #[tokio::test]
    async fn capacity_bounds_the_cache() {
        let cache = WorkspaceRuntimeCache::new(2);
        for name in ["a", "b", "c"] {
            cache.set_workspace(&workspace(name)).await;
        }

        assert_eq!(cache.len().await, 2);
        assert!(cache
            .get_workspace_by_name(&WorkspaceName::new("a").unwrap())
            .await
            .is_none());
    }
}
