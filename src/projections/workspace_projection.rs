// Copyright 2025 Cowboy AI, LLC.

//! Workspace projection
//!
//! Folds workspace events into the workspace table. Each event becomes exactly one unit
//! of work, so the row of the named workspace and the fan-out to its dependents are
//! committed together.
//!
//! Outdating is propagated one level per event: only workspaces whose base is the changed
//! workspace are marked. Deeper workspaces become outdated once their own base changes.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{Projection, ProjectionError, ProjectionStatus};
use crate::events::{EventEnvelope, SequenceNumber};
use crate::infrastructure::CheckpointManager;
use crate::persistence::{WorkspaceMutation, WorkspaceStore, WorkspaceUnitOfWork};
use crate::workspace::{
    ContentStreamId, Workspace, WorkspaceEvent, WorkspaceFinder, WorkspaceName,
    WorkspaceRuntimeCache, WorkspaceStatus,
};

/// Projection maintaining the workspace read model
pub struct WorkspaceProjection {
    projection_id: String,
    store: Arc<dyn WorkspaceStore>,
    cache: Arc<WorkspaceRuntimeCache>,
    checkpoints: CheckpointManager,
    finder: WorkspaceFinder,
}

impl WorkspaceProjection {
    /// Create a projection writing to `store`, checkpointed under `table_name`
    pub fn new(
        table_name: impl Into<String>,
        store: Arc<dyn WorkspaceStore>,
        checkpoints: CheckpointManager,
        cache: Arc<WorkspaceRuntimeCache>,
    ) -> Self {
        let finder = WorkspaceFinder::new(store.clone(), cache.clone());
        Self {
            projection_id: table_name.into(),
            store,
            cache,
            checkpoints,
            finder,
        }
    }

    /// The runtime cache shared with the finder
    pub fn runtime_cache(&self) -> &Arc<WorkspaceRuntimeCache> {
        &self.cache
    }

    /// The checkpoint manager of this projection
    pub fn checkpoints(&self) -> &CheckpointManager {
        &self.checkpoints
    }

    /// Translate an event into the writes it causes
    pub fn unit_of_work_for(event: &WorkspaceEvent) -> WorkspaceUnitOfWork {
        match event {
            WorkspaceEvent::WorkspaceWasCreated(e) => WorkspaceUnitOfWork::new().with(
                WorkspaceMutation::Insert(Workspace {
                    workspace_name: e.workspace_name.clone(),
                    base_workspace_name: Some(e.base_workspace_name.clone()),
                    workspace_title: e.workspace_title.clone(),
                    workspace_description: e.workspace_description.clone(),
                    workspace_owner: e.workspace_owner.clone(),
                    current_content_stream_id: e.new_content_stream_id.clone(),
                    status: WorkspaceStatus::UpToDate,
                }),
            ),
            WorkspaceEvent::RootWorkspaceWasCreated(e) => WorkspaceUnitOfWork::new().with(
                WorkspaceMutation::Insert(Workspace {
                    workspace_name: e.workspace_name.clone(),
                    base_workspace_name: None,
                    workspace_title: e.workspace_title.clone(),
                    workspace_description: e.workspace_description.clone(),
                    workspace_owner: None,
                    current_content_stream_id: e.new_content_stream_id.clone(),
                    status: WorkspaceStatus::UpToDate,
                }),
            ),
            WorkspaceEvent::WorkspaceWasRenamed(e) => {
                WorkspaceUnitOfWork::new().with(WorkspaceMutation::UpdateMetadata {
                    workspace_name: e.workspace_name.clone(),
                    workspace_title: e.workspace_title.clone(),
                    workspace_description: e.workspace_description.clone(),
                })
            }
            WorkspaceEvent::WorkspaceWasDiscarded(e) => {
                discarded(&e.workspace_name, e.new_content_stream_id.clone())
            }
            WorkspaceEvent::WorkspaceWasPartiallyDiscarded(e) => {
                discarded(&e.workspace_name, e.new_content_stream_id.clone())
            }
            WorkspaceEvent::WorkspaceWasPublished(e) => published(
                &e.source_workspace_name,
                &e.target_workspace_name,
                e.new_source_content_stream_id.clone(),
            ),
            WorkspaceEvent::WorkspaceWasPartiallyPublished(e) => published(
                &e.source_workspace_name,
                &e.target_workspace_name,
                e.new_source_content_stream_id.clone(),
            ),
            WorkspaceEvent::WorkspaceWasRebased(e) => WorkspaceUnitOfWork::new()
                .with(WorkspaceMutation::SetContentStream {
                    workspace_name: e.workspace_name.clone(),
                    content_stream_id: e.new_content_stream_id.clone(),
                })
                .with(WorkspaceMutation::MarkDependentsOutdated {
                    base_workspace_name: e.workspace_name.clone(),
                })
                .with(WorkspaceMutation::SetStatus {
                    workspace_name: e.workspace_name.clone(),
                    status: WorkspaceStatus::UpToDate,
                }),
            WorkspaceEvent::WorkspaceRebaseFailed(e) => {
                WorkspaceUnitOfWork::new().with(WorkspaceMutation::SetStatus {
                    workspace_name: e.workspace_name.clone(),
                    status: WorkspaceStatus::OutdatedConflict,
                })
            }
            WorkspaceEvent::WorkspaceWasRemoved(e) => {
                WorkspaceUnitOfWork::new().with(WorkspaceMutation::Delete {
                    workspace_name: e.workspace_name.clone(),
                })
            }
            WorkspaceEvent::WorkspaceOwnerWasChanged(e) => {
                WorkspaceUnitOfWork::new().with(WorkspaceMutation::SetOwner {
                    workspace_name: e.workspace_name.clone(),
                    workspace_owner: e.new_workspace_owner.clone(),
                })
            }
            WorkspaceEvent::WorkspaceBaseWorkspaceWasChanged(e) => {
                WorkspaceUnitOfWork::new().with(WorkspaceMutation::SetBase {
                    workspace_name: e.workspace_name.clone(),
                    base_workspace_name: e.base_workspace_name.clone(),
                    content_stream_id: e.new_content_stream_id.clone(),
                })
            }
        }
    }

    fn decode(envelope: &EventEnvelope) -> Result<WorkspaceEvent, ProjectionError> {
        if !WorkspaceEvent::EVENT_TYPES.contains(&envelope.event_type.as_str()) {
            return Err(ProjectionError::UnsupportedEvent {
                event_type: envelope.event_type.clone(),
            });
        }
        envelope
            .decode()
            .map_err(|e| ProjectionError::MalformedEvent {
                event_type: envelope.event_type.clone(),
                reason: e.to_string(),
            })
    }
}

/// Switches the stream and outdates dependents; the discarded workspace keeps its status
///
/// Some event-sourced read models also mark a fully discarded workspace itself outdated.
fn discarded(
    workspace_name: &WorkspaceName,
    new_content_stream_id: ContentStreamId,
) -> WorkspaceUnitOfWork {
    WorkspaceUnitOfWork::new()
        .with(WorkspaceMutation::SetContentStream {
            workspace_name: workspace_name.clone(),
            content_stream_id: new_content_stream_id,
        })
        .with(WorkspaceMutation::MarkDependentsOutdated {
            base_workspace_name: workspace_name.clone(),
        })
}

/// The source is reconciled with its target; everything based on either one is not
fn published(
    source_workspace_name: &WorkspaceName,
    target_workspace_name: &WorkspaceName,
    new_source_content_stream_id: ContentStreamId,
) -> WorkspaceUnitOfWork {
    WorkspaceUnitOfWork::new()
        .with(WorkspaceMutation::SetContentStream {
            workspace_name: source_workspace_name.clone(),
            content_stream_id: new_source_content_stream_id,
        })
        .with(WorkspaceMutation::MarkDependentsOutdated {
            base_workspace_name: target_workspace_name.clone(),
        })
        // The source is itself a dependent of the target.
        .with(WorkspaceMutation::SetStatus {
            workspace_name: source_workspace_name.clone(),
            status: WorkspaceStatus::UpToDate,
        })
        .with(WorkspaceMutation::MarkDependentsOutdated {
            base_workspace_name: source_workspace_name.clone(),
        })
}

#[async_trait]
impl Projection for WorkspaceProjection {
    type State = WorkspaceFinder;

    fn projection_id(&self) -> &str {
        &self.projection_id
    }

    async fn set_up(&self) -> Result<(), ProjectionError> {
        self.store.set_up().await?;
        debug!(projection_id = %self.projection_id, "Workspace projection set up");
        Ok(())
    }

    async fn status(&self) -> ProjectionStatus {
        match self.store.is_set_up().await {
            Ok(true) => ProjectionStatus::Ok,
            Ok(false) => ProjectionStatus::SetupRequired(format!(
                "workspace table {} does not exist",
                self.projection_id
            )),
            Err(e) => ProjectionStatus::Error(e.to_string()),
        }
    }

    fn can_handle(&self, envelope: &EventEnvelope) -> bool {
        WorkspaceEvent::EVENT_TYPES.contains(&envelope.event_type.as_str())
    }

    async fn apply(&self, envelope: &EventEnvelope) -> Result<(), ProjectionError> {
        let event = match Self::decode(envelope) {
            Ok(event) => event,
            Err(e) => {
                warn!(
                    sequence_number = %envelope.sequence_number,
                    event_type = %envelope.event_type,
                    error = %e,
                    "Workspace projection rejected event"
                );
                return Err(e);
            }
        };

        if self.cache.is_enabled() {
            self.cache.disable_cache().await;
        }
        let unit_of_work = Self::unit_of_work_for(&event);
        self.store.commit(unit_of_work).await?;

        debug!(
            sequence_number = %envelope.sequence_number,
            event_type = event.event_type(),
            workspace = %event.workspace_name(),
            "Applied workspace event"
        );
        Ok(())
    }

    async fn reset(&self) -> Result<(), ProjectionError> {
        self.cache.disable_cache().await;
        self.store.truncate().await?;
        self.checkpoints.reset_projection(&self.projection_id).await?;
        debug!(projection_id = %self.projection_id, "Workspace projection reset");
        Ok(())
    }

    async fn checkpoint(&self) -> Result<SequenceNumber, ProjectionError> {
        Ok(self
            .checkpoints
            .get_position(&self.projection_id)
            .await?
            .map(|position| position.sequence_number())
            .unwrap_or_default())
    }

    async fn mark_stale(&self) {
        self.cache.disable_cache().await;
    }

    async fn after_catch_up(&self) {
        self.cache.enable_cache();
    }

    fn state(&self) -> WorkspaceFinder {
        self.finder.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::InMemoryWorkspaceStore;
    use crate::workspace::{
        WorkspaceDescription, WorkspaceTitle, WorkspaceWasRemoved, WorkspaceWasRenamed,
    };

    fn projection() -> WorkspaceProjection {
        WorkspaceProjection::new(
            "cr_test_p_workspace",
            Arc::new(InMemoryWorkspaceStore::new()),
            CheckpointManager::in_memory(),
            Arc::new(WorkspaceRuntimeCache::default()),
        )
    }

    #[test]
    fn publishing_fans_out_to_both_sides() {
        let source = WorkspaceName::new("review").unwrap();
        let target = WorkspaceName::for_live();
        let stream = ContentStreamId::create();

        let unit_of_work = published(&source, &target, stream.clone());

        assert_eq!(
            unit_of_work.mutations(),
            &[
                WorkspaceMutation::SetContentStream {
                    workspace_name: source.clone(),
                    content_stream_id: stream,
                },
                WorkspaceMutation::MarkDependentsOutdated {
                    base_workspace_name: target,
                },
                WorkspaceMutation::SetStatus {
                    workspace_name: source.clone(),
                    status: WorkspaceStatus::UpToDate,
                },
                WorkspaceMutation::MarkDependentsOutdated {
                    base_workspace_name: source,
                },
            ]
        );
    }

    #[test]
    fn renaming_touches_metadata_only() {
        let unit_of_work = WorkspaceProjection::unit_of_work_for(
            &WorkspaceEvent::WorkspaceWasRenamed(WorkspaceWasRenamed {
                workspace_name: WorkspaceName::for_live(),
                workspace_title: WorkspaceTitle::new("Live"),
                workspace_description: WorkspaceDescription::new("Public"),
            }),
        );

        assert_eq!(unit_of_work.mutations().len(), 1);
        assert!(matches!(
            unit_of_work.mutations()[0],
            WorkspaceMutation::UpdateMetadata { .. }
        ));
    }

    #[tokio::test]
    async fn status_reports_missing_setup() {
        let projection = projection();
        assert!(matches!(
            projection.status().await,
            ProjectionStatus::SetupRequired(_)
        ));
        projection.set_up().await.unwrap();
        assert_eq!(projection.status().await, ProjectionStatus::Ok);
    }

    #[tokio::test]
    async fn unknown_and_malformed_events_are_rejected() {
        let projection = projection();
        projection.set_up().await.unwrap();

        let unknown = EventEnvelope::raw(
            SequenceNumber::new(1),
            "NodeAggregateWasMoved",
            serde_json::json!({}),
        );
        assert!(!projection.can_handle(&unknown));
        assert!(matches!(
            projection.apply(&unknown).await,
            Err(ProjectionError::UnsupportedEvent { .. })
        ));

        let malformed = EventEnvelope::raw(
            SequenceNumber::new(2),
            "WorkspaceWasRemoved",
            serde_json::json!({"workspaceName": 42}),
        );
        assert!(projection.can_handle(&malformed));
        assert!(matches!(
            projection.apply(&malformed).await,
            Err(ProjectionError::MalformedEvent { .. })
        ));
    }

    #[tokio::test]
    async fn applying_disables_the_cache_until_catch_up_ends() {
        let projection = projection();
        projection.set_up().await.unwrap();

        let envelope = EventEnvelope::new(
            SequenceNumber::new(1),
            &WorkspaceEvent::WorkspaceWasRemoved(WorkspaceWasRemoved {
                workspace_name: WorkspaceName::new("gone").unwrap(),
            }),
        )
        .unwrap();
        projection.apply(&envelope).await.unwrap();
        assert!(!projection.runtime_cache().is_enabled());

        projection.after_catch_up().await;
        assert!(projection.runtime_cache().is_enabled());
    }
}
