// Copyright 2025 Cowboy AI, LLC.

//! Workspace table stored in a NATS JetStream key-value bucket
//!
//! The whole table is a single JSON document under one key, so a unit of work becomes
//! exactly one `put` and is atomic for every reader.

use async_nats::jetstream::kv::Store as KvStore;
use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Mutex;
use tracing::debug;

use super::errors::ReadModelError;
use super::unit_of_work::{query, WorkspaceTable, WorkspaceUnitOfWork};
use super::workspace_store::WorkspaceStore;
use crate::workspace::{ContentStreamId, Workspace, WorkspaceName, WorkspaceStatus};

/// JetStream-backed workspace table
pub struct JetStreamWorkspaceStore {
    kv_store: KvStore,
    table_key: String,
    write_lock: Mutex<()>,
}

impl JetStreamWorkspaceStore {
    /// Open (creating if needed) the bucket holding the table
    pub async fn new(
        client: async_nats::Client,
        bucket_name: &str,
        table_name: &str,
    ) -> Result<Self, ReadModelError> {
        let jetstream = async_nats::jetstream::new(client);

        let kv_store = jetstream
            .create_key_value(async_nats::jetstream::kv::Config {
                bucket: bucket_name.to_string(),
                description: "Workspace read model".to_string(),
                history: 5,
                storage: async_nats::jetstream::stream::StorageType::File,
                ..Default::default()
            })
            .await
            .map_err(|e| ReadModelError::NatsError(e.to_string()))?;

        Ok(Self {
            kv_store,
            table_key: table_name.to_string(),
            write_lock: Mutex::new(()),
        })
    }

    async fn load_table(&self) -> Result<Option<WorkspaceTable>, ReadModelError> {
        match self.kv_store.get(&self.table_key).await {
            Ok(Some(entry)) => {
                let rows: Vec<Workspace> = serde_json::from_slice(&entry)?;
                Ok(Some(
                    rows.into_iter()
                        .map(|row| (row.workspace_name.clone(), row))
                        .collect(),
                ))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(ReadModelError::NatsError(e.to_string())),
        }
    }

    async fn require_table(&self) -> Result<WorkspaceTable, ReadModelError> {
        self.load_table()
            .await?
            .ok_or_else(|| ReadModelError::SetupRequired(self.table_key.clone()))
    }

    async fn store_table(&self, table: &WorkspaceTable) -> Result<(), ReadModelError> {
        let rows: Vec<&Workspace> = table.values().collect();
        let value = serde_json::to_vec(&rows)?;
        self.kv_store
            .put(&self.table_key, Bytes::from(value))
            .await
            .map_err(|e| ReadModelError::NatsError(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl WorkspaceStore for JetStreamWorkspaceStore {
    async fn set_up(&self) -> Result<(), ReadModelError> {
        let _guard = self.write_lock.lock().await;
        if self.load_table().await?.is_none() {
            self.store_table(&WorkspaceTable::new()).await?;
            debug!(table = %self.table_key, "Created workspace table");
        }
        Ok(())
    }

    async fn is_set_up(&self) -> Result<bool, ReadModelError> {
        Ok(self.load_table().await?.is_some())
    }

    async fn commit(&self, unit_of_work: WorkspaceUnitOfWork) -> Result<(), ReadModelError> {
        let _guard = self.write_lock.lock().await;
        let mut table = self.require_table().await?;
        let touched = unit_of_work.apply_to(&mut table);
        self.store_table(&table).await?;
        debug!(
            table = %self.table_key,
            mutations = unit_of_work.mutations().len(),
            touched,
            "Committed workspace unit of work"
        );
        Ok(())
    }

    async fn truncate(&self) -> Result<(), ReadModelError> {
        let _guard = self.write_lock.lock().await;
        self.store_table(&WorkspaceTable::new()).await
    }

    async fn find_by_name(&self, name: &WorkspaceName) -> Result<Option<Workspace>, ReadModelError> {
        Ok(self.require_table().await?.remove(name))
    }

    async fn find_by_current_content_stream_id(
        &self,
        content_stream_id: &ContentStreamId,
    ) -> Result<Option<Workspace>, ReadModelError> {
        Ok(query::by_current_content_stream_id(
            &self.require_table().await?,
            content_stream_id,
        ))
    }

    async fn find_by_base_workspace(
        &self,
        base_workspace_name: &WorkspaceName,
    ) -> Result<Vec<Workspace>, ReadModelError> {
        Ok(query::by_base_workspace(
            &self.require_table().await?,
            base_workspace_name,
        ))
    }

    async fn find_by_status(
        &self,
        status: WorkspaceStatus,
    ) -> Result<Vec<Workspace>, ReadModelError> {
        Ok(query::by_status(&self.require_table().await?, status))
    }

    async fn find_all(&self) -> Result<Vec<Workspace>, ReadModelError> {
        Ok(self.require_table().await?.into_values().collect())
    }
}
