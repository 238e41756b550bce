// Copyright 2025 Cowboy AI, LLC.

//! The content repository facade
//!
//! ```mermaid
//! graph LR
//!     C[ContentRepositoryConfig] --> S[ContentDimensionSource]
//!     S --> G[InterDimensionalVariationGraph]
//!     C --> W[WorkspaceStore]
//!     E[Event stream] --> U[CatchUp]
//!     U --> P[WorkspaceProjection]
//!     P --> W
//!     W --> F[WorkspaceFinder]
//! ```
//!
//! The variation graph is built once and shared read-only. The workspace projection is
//! the only writer of the workspace table, and catch-up runs one at a time.

use futures::Stream;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::config::ContentRepositoryConfig;
use crate::dimension::ContentDimensionSource;
use crate::dimension_space::{ContentDimensionZookeeper, InterDimensionalVariationGraph};
use crate::errors::ContentRepositoryResult;
use crate::events::{EventEnvelope, SequenceNumber};
use crate::infrastructure::{CatchUp, CatchUpStats, CheckpointManager, NatsClient};
use crate::persistence::{InMemoryWorkspaceStore, WorkspaceStore};
use crate::projections::{Projection, ProjectionStatus, WorkspaceProjection};
use crate::workspace::{WorkspaceFinder, WorkspaceRuntimeCache};

/// Dimension space and workspace state of one content repository
pub struct ContentRepository {
    zookeeper: Arc<ContentDimensionZookeeper>,
    variation_graph: Arc<InterDimensionalVariationGraph>,
    workspace_projection: Arc<WorkspaceProjection>,
    checkpoints: CheckpointManager,
    catch_up_lock: Mutex<()>,
}

impl ContentRepository {
    /// Assemble a repository from its parts
    pub fn new(
        dimension_source: &dyn ContentDimensionSource,
        workspace_table_name: &str,
        workspace_store: Arc<dyn WorkspaceStore>,
        checkpoints: CheckpointManager,
        workspace_cache_capacity: usize,
    ) -> ContentRepositoryResult<Self> {
        let zookeeper = ContentDimensionZookeeper::new(dimension_source);
        let variation_graph = InterDimensionalVariationGraph::new(dimension_source, &zookeeper)?;
        let workspace_projection = WorkspaceProjection::new(
            workspace_table_name,
            workspace_store,
            checkpoints.clone(),
            Arc::new(WorkspaceRuntimeCache::new(workspace_cache_capacity)),
        );

        Ok(Self {
            zookeeper: Arc::new(zookeeper),
            variation_graph: Arc::new(variation_graph),
            workspace_projection: Arc::new(workspace_projection),
            checkpoints,
            catch_up_lock: Mutex::new(()),
        })
    }

    /// A repository keeping its read model and checkpoints in memory
    pub fn in_memory(config: &ContentRepositoryConfig) -> ContentRepositoryResult<Self> {
        config.validate()?;
        let source = config.content_dimension_source()?;
        Self::new(
            &source,
            &config.workspace_table_name,
            Arc::new(InMemoryWorkspaceStore::new()),
            CheckpointManager::in_memory(),
            config.workspace_cache_capacity,
        )
    }

    /// A repository backed by NATS JetStream
    ///
    /// Falls back to default connection settings when the configuration has no `nats` block.
    pub async fn connect(config: &ContentRepositoryConfig) -> ContentRepositoryResult<Self> {
        config.validate()?;
        let source = config.content_dimension_source()?;
        let client = NatsClient::connect(config.nats.clone().unwrap_or_default()).await?;
        let workspace_store = client.workspace_store(&config.workspace_table_name).await?;
        let checkpoint_store = client.checkpoint_store().await?;
        info!(
            url = %client.config().url,
            table = %config.workspace_table_name,
            "Content repository connected to NATS"
        );

        Self::new(
            &source,
            &config.workspace_table_name,
            Arc::new(workspace_store),
            CheckpointManager::new(Arc::new(checkpoint_store)),
            config.workspace_cache_capacity,
        )
    }

    /// The allowed dimension subspace
    pub fn zookeeper(&self) -> &Arc<ContentDimensionZookeeper> {
        &self.zookeeper
    }

    /// The shared variation graph
    pub fn variation_graph(&self) -> &Arc<InterDimensionalVariationGraph> {
        &self.variation_graph
    }

    /// The workspace projection
    pub fn workspace_projection(&self) -> &Arc<WorkspaceProjection> {
        &self.workspace_projection
    }

    /// Query API over workspaces
    pub fn workspace_finder(&self) -> WorkspaceFinder {
        self.workspace_projection.state()
    }

    /// Prepare read model storage; idempotent
    pub async fn set_up(&self) -> ContentRepositoryResult<()> {
        Ok(self.workspace_projection.set_up().await?)
    }

    /// Readiness of the workspace read model
    pub async fn status(&self) -> ProjectionStatus {
        self.workspace_projection.status().await
    }

    /// Sequence number up to which events are projected
    pub async fn checkpoint(&self) -> ContentRepositoryResult<SequenceNumber> {
        Ok(self.workspace_projection.checkpoint().await?)
    }

    /// Project every new event of `events`
    ///
    /// Concurrent calls are serialized; each one starts from the checkpoint the previous
    /// one left behind.
    pub async fn catch_up<S>(&self, events: S) -> ContentRepositoryResult<CatchUpStats>
    where
        S: Stream<Item = EventEnvelope> + Send,
    {
        let _guard = self.catch_up_lock.lock().await;
        let catch_up = CatchUp::new(self.workspace_projection.clone(), self.checkpoints.clone());
        Ok(catch_up.run(events).await?)
    }

    /// Drop the workspace read model so it can be rebuilt from the beginning
    pub async fn reset(&self) -> ContentRepositoryResult<()> {
        let _guard = self.catch_up_lock.lock().await;
        Ok(self.workspace_projection.reset().await?)
    }
}

impl std::fmt::Debug for ContentRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentRepository")
            .field("projection_id", &self.workspace_projection.projection_id())
            .field(
                "dimension_space_points",
                &self.variation_graph.get_dimension_space_points().len(),
            )
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension_space::{DimensionSpacePoint, VariantType};
    use crate::workspace::{
        ContentStreamId, RootWorkspaceWasCreated, WorkspaceDescription, WorkspaceEvent,
        WorkspaceName, WorkspaceTitle,
    };
    use futures::stream;

    const CONFIG: &str = r#"{
        "contentDimensions": {
            "language": {
                "values": {
                    "mul": { "specializations": { "de": { "specializations": { "gsw": {} } } } }
                }
            }
        }
    }"#;

    #[tokio::test]
    async fn test_in_memory_repository() {
        let config = ContentRepositoryConfig::from_json_str(CONFIG).unwrap();
        let repository = ContentRepository::in_memory(&config).unwrap();

        let graph = repository.variation_graph();
        assert_eq!(graph.get_dimension_space_points().len(), 3);
        let gsw = DimensionSpacePoint::new([("language", "gsw")]);
        let mul = DimensionSpacePoint::new([("language", "mul")]);
        assert_eq!(
            graph.get_variant_type(&gsw, &mul).unwrap(),
            VariantType::Specialization
        );

        assert!(matches!(repository.status().await, ProjectionStatus::SetupRequired(_)));
        repository.set_up().await.unwrap();
        assert_eq!(repository.status().await, ProjectionStatus::Ok);

        let live = WorkspaceName::for_live();
        let event = WorkspaceEvent::RootWorkspaceWasCreated(RootWorkspaceWasCreated {
            workspace_name: live.clone(),
            workspace_title: WorkspaceTitle::new("Live"),
            workspace_description: WorkspaceDescription::new("Public content"),
            new_content_stream_id: ContentStreamId::create(),
        });
        let envelope = EventEnvelope::new(SequenceNumber::new(1), &event).unwrap();
        let stats = repository.catch_up(stream::iter(vec![envelope])).await.unwrap();
        assert_eq!(stats.events_applied, 1);
        assert_eq!(repository.checkpoint().await.unwrap(), SequenceNumber::new(1));

        let workspace = repository.workspace_finder().get_by_name(&live).await.unwrap();
        assert!(workspace.is_root_workspace());

        repository.reset().await.unwrap();
        assert_eq!(repository.checkpoint().await.unwrap(), SequenceNumber::none());
        let err = repository.workspace_finder().get_by_name(&live).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_invalid_dimensions_are_configuration_errors() {
        let config = ContentRepositoryConfig::from_json_str(
            r#"{"contentDimensions": {"language": {"values": {}}}}"#,
        )
        .unwrap();
        let err = ContentRepository::in_memory(&config).unwrap_err();
        assert!(err.is_configuration_error());
    }
}
