// Copyright 2025 Cowboy AI, LLC.

//! Integration tests for the JetStream-backed stores with a real NATS server
//!
//! These tests require a running NATS server with JetStream enabled:
//! ```bash
//! docker run -d --name nats-test -p 4222:4222 nats:latest -js
//! ```

use cim_content_repository::infrastructure::CheckpointStore;
use cim_content_repository::workspace::{
    RootWorkspaceWasCreated, WorkspaceDescription, WorkspaceTitle, WorkspaceWasCreated,
};
use cim_content_repository::{
    ContentRepository, ContentRepositoryConfig, ContentStreamId, EventEnvelope, NatsClient,
    NatsConfig, ProjectionStatus, SequenceNumber, WorkspaceEvent, WorkspaceName,
    WorkspaceStatus, WorkspaceStore,
};
use futures::stream;
use uuid::Uuid;

fn isolated_config() -> ContentRepositoryConfig {
    let suffix = Uuid::new_v4().simple().to_string();
    ContentRepositoryConfig {
        workspace_table_name: format!("cr_test_{suffix}_p_workspace"),
        nats: Some(NatsConfig {
            read_model_bucket: format!("content_repository_test_{suffix}"),
            checkpoint_bucket: format!("projection_checkpoints_test_{suffix}"),
            ..NatsConfig::default()
        }),
        ..ContentRepositoryConfig::default()
    }
}

#[tokio::test]
#[ignore] // Requires NATS server to be running
async fn test_workspace_store_requires_setup() {
    let config = isolated_config();
    let client = NatsClient::connect(config.nats.clone().unwrap()).await.unwrap();
    assert!(client.is_connected().await);

    let store = client
        .workspace_store(&config.workspace_table_name)
        .await
        .unwrap();
    assert!(!store.is_set_up().await.unwrap());
    assert!(store.find_all().await.is_err());

    store.set_up().await.unwrap();
    store.set_up().await.unwrap();
    assert!(store.is_set_up().await.unwrap());
    assert!(store.find_all().await.unwrap().is_empty());
}

#[tokio::test]
#[ignore] // Requires NATS server to be running
async fn test_repository_catch_up_survives_reconnect() {
    let config = isolated_config();
    let live_stream = ContentStreamId::create();
    let events = [
        WorkspaceEvent::RootWorkspaceWasCreated(RootWorkspaceWasCreated {
            workspace_name: WorkspaceName::for_live(),
            workspace_title: WorkspaceTitle::new("Live"),
            workspace_description: WorkspaceDescription::new(""),
            new_content_stream_id: live_stream.clone(),
        }),
        WorkspaceEvent::WorkspaceWasCreated(WorkspaceWasCreated {
            workspace_name: WorkspaceName::new("user-alice").unwrap(),
            base_workspace_name: WorkspaceName::for_live(),
            workspace_title: WorkspaceTitle::new("Alice"),
            workspace_description: WorkspaceDescription::new(""),
            new_content_stream_id: ContentStreamId::create(),
            workspace_owner: Some("alice".to_string()),
        }),
    ];
    let envelopes: Vec<EventEnvelope> = events
        .iter()
        .enumerate()
        .map(|(i, event)| {
            EventEnvelope::new(SequenceNumber::new(i as u64 + 1), event).unwrap()
        })
        .collect();

    let repository = ContentRepository::connect(&config).await.unwrap();
    assert!(matches!(
        repository.status().await,
        ProjectionStatus::SetupRequired(_)
    ));
    repository.set_up().await.unwrap();
    repository
        .catch_up(stream::iter(envelopes.clone()))
        .await
        .unwrap();
    drop(repository);

    let reconnected = ContentRepository::connect(&config).await.unwrap();
    assert_eq!(reconnected.checkpoint().await.unwrap(), SequenceNumber::new(2));
    let stats = reconnected.catch_up(stream::iter(envelopes)).await.unwrap();
    assert_eq!(stats.events_applied, 0);
    assert_eq!(stats.events_already_processed, 2);

    let finder = reconnected.workspace_finder();
    let alice = finder
        .get_by_name(&WorkspaceName::new("user-alice").unwrap())
        .await
        .unwrap();
    assert_eq!(alice.status, WorkspaceStatus::UpToDate);
    assert_eq!(
        finder
            .find_one_by_current_content_stream_id(&live_stream)
            .await
            .unwrap()
            .map(|w| w.workspace_name),
        Some(WorkspaceName::for_live())
    );

    reconnected.reset().await.unwrap();
    assert_eq!(reconnected.checkpoint().await.unwrap(), SequenceNumber::none());
}

#[tokio::test]
#[ignore] // Requires NATS server to be running
async fn test_checkpoint_store_roundtrip() {
    let config = isolated_config();
    let client = NatsClient::connect(config.nats.clone().unwrap()).await.unwrap();
    let store = client.checkpoint_store().await.unwrap();

    assert!(store.load_checkpoint("workspaces").await.unwrap().is_none());
    store.delete_checkpoint("workspaces").await.unwrap();
}
