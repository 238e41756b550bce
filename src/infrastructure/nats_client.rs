// Copyright 2025 Cowboy AI, LLC.

//! NATS client for durable read model and checkpoint storage

use async_nats::{Client, ConnectOptions};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use super::projection_checkpoint::{CheckpointError, JetStreamCheckpointStore};
use crate::persistence::{JetStreamWorkspaceStore, ReadModelError};

/// Errors that can occur when working with NATS
#[derive(Debug, Error)]
pub enum NatsError {
    /// Failed to establish connection to NATS server
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Error occurred in JetStream operations
    #[error("JetStream error: {0}")]
    JetStreamError(String),
}

impl From<ReadModelError> for NatsError {
    fn from(err: ReadModelError) -> Self {
        NatsError::JetStreamError(err.to_string())
    }
}

impl From<CheckpointError> for NatsError {
    fn from(err: CheckpointError) -> Self {
        NatsError::JetStreamError(err.to_string())
    }
}

/// Configuration for NATS client connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NatsConfig {
    /// NATS server URL (e.g., "nats://localhost:4222")
    pub url: String,

    /// Optional username for authentication
    pub user: Option<String>,

    /// Optional password for authentication
    pub password: Option<String>,

    /// Whether TLS is required
    pub tls_required: bool,

    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,

    /// Reconnect interval in seconds
    pub reconnect_interval_secs: u64,

    /// Maximum reconnect attempts (0 = infinite)
    pub max_reconnects: usize,

    /// KV bucket holding read model tables
    pub read_model_bucket: String,

    /// KV bucket holding projection checkpoints
    pub checkpoint_bucket: String,
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            url: "nats://localhost:4222".to_string(),
            user: None,
            password: None,
            tls_required: false,
            connection_timeout_secs: 10,
            reconnect_interval_secs: 5,
            max_reconnects: 0,
            read_model_bucket: "content_repository".to_string(),
            checkpoint_bucket: "projection_checkpoints".to_string(),
        }
    }
}

/// NATS client wrapper handing out JetStream-backed stores
#[derive(Debug)]
pub struct NatsClient {
    client: Client,
    config: NatsConfig,
}

impl NatsClient {
    /// Connect to NATS server with the provided configuration
    pub async fn connect(config: NatsConfig) -> Result<Self, NatsError> {
        let reconnect_interval = Duration::from_secs(config.reconnect_interval_secs);
        let max_reconnects = config.max_reconnects;
        let mut options = ConnectOptions::new()
            .connection_timeout(Duration::from_secs(config.connection_timeout_secs))
            .reconnect_delay_callback(move |attempts| {
                if max_reconnects > 0 && attempts >= max_reconnects {
                    Duration::from_secs(0)
                } else {
                    reconnect_interval
                }
            })
            .event_callback(|event| async move {
                match event {
                    async_nats::Event::Disconnected => warn!("NATS disconnected"),
                    async_nats::Event::Connected => info!("NATS connected"),
                    async_nats::Event::ClientError(err) => warn!(error = %err, "NATS client error"),
                    _ => {}
                }
            });

        if let (Some(user), Some(password)) = (&config.user, &config.password) {
            options = options.user_and_password(user.clone(), password.clone());
        }

        if config.tls_required {
            options = options.require_tls(true);
        }

        let client = options.connect(&config.url).await.map_err(|e| {
            NatsError::ConnectionFailed(format!("Failed to connect to {}: {}", config.url, e))
        })?;

        Ok(Self { client, config })
    }

    /// Get the underlying NATS client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Get the configuration
    pub fn config(&self) -> &NatsConfig {
        &self.config
    }

    /// Check if the client is connected
    pub async fn is_connected(&self) -> bool {
        self.client.flush().await.is_ok()
    }

    /// Open the workspace table `table_name` in the read model bucket
    pub async fn workspace_store(&self, table_name: &str) -> Result<JetStreamWorkspaceStore, NatsError> {
        Ok(JetStreamWorkspaceStore::new(
            self.client.clone(),
            &self.config.read_model_bucket,
            table_name,
        )
        .await?)
    }

    /// Open the checkpoint bucket
    pub async fn checkpoint_store(&self) -> Result<JetStreamCheckpointStore, NatsError> {
        Ok(JetStreamCheckpointStore::new(self.client.clone(), &self.config.checkpoint_bucket).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NatsConfig::default();
        assert_eq!(config.url, "nats://localhost:4222");
        assert_eq!(config.connection_timeout_secs, 10);
        assert_eq!(config.max_reconnects, 0);
        assert_eq!(config.checkpoint_bucket, "projection_checkpoints");
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: NatsConfig = serde_json::from_str(
            r#"{"url": "nats://nats.internal:4222", "user": "cr", "password": "secret"}"#,
        )
        .unwrap();

        assert_eq!(config.url, "nats://nats.internal:4222");
        assert_eq!(config.user, Some("cr".to_string()));
        assert_eq!(config.read_model_bucket, "content_repository");
    }
}
