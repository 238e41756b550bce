// Copyright 2025 Cowboy AI, LLC.

//! Repository configuration
//!
//! A repository is configured with one JSON document:
//!
//! ```json
//! {
//!   "contentDimensions": {
//!     "language": {
//!       "values": {
//!         "mul": { "specializations": { "de": { "specializations": { "gsw": {} } } } }
//!       }
//!     }
//!   },
//!   "workspaceTableName": "cr_default_p_workspace",
//!   "workspaceCacheCapacity": 256,
//!   "nats": { "url": "nats://localhost:4222" }
//! }
//! ```
//!
//! Everything except `contentDimensions` may be omitted.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::dimension::{
    ConfigurationBasedContentDimensionSource, DimensionError, DimensionsConfiguration,
};
use crate::infrastructure::NatsConfig;
use crate::workspace::DEFAULT_WORKSPACE_CACHE_CAPACITY;

/// Environment variable overriding the NATS url
pub const NATS_URL_ENV: &str = "CONTENT_REPOSITORY_NATS_URL";

/// Table used when none is configured
pub const DEFAULT_WORKSPACE_TABLE_NAME: &str = "cr_default_p_workspace";

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path of the file
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The document is not valid configuration
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document parsed but holds unusable values
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration of a content repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRepositoryConfig {
    /// Content dimensions in priority order
    #[serde(default)]
    pub content_dimensions: DimensionsConfiguration,

    /// Name of the workspace read model table
    #[serde(default = "default_workspace_table_name")]
    pub workspace_table_name: String,

    /// Entries kept per index of the workspace runtime cache
    #[serde(default = "default_workspace_cache_capacity")]
    pub workspace_cache_capacity: usize,

    /// Durable storage; in-memory storage is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nats: Option<NatsConfig>,
}

fn default_workspace_table_name() -> String {
    DEFAULT_WORKSPACE_TABLE_NAME.to_string()
}

fn default_workspace_cache_capacity() -> usize {
    DEFAULT_WORKSPACE_CACHE_CAPACITY
}

impl Default for ContentRepositoryConfig {
    fn default() -> Self {
        Self {
            content_dimensions: DimensionsConfiguration::default(),
            workspace_table_name: default_workspace_table_name(),
            workspace_cache_capacity: default_workspace_cache_capacity(),
            nats: None,
        }
    }
}

impl ContentRepositoryConfig {
    /// Parse a JSON configuration document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up through `lookup`
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(NATS_URL_ENV).filter(|url| !url.trim().is_empty()) {
            self.nats.get_or_insert_with(NatsConfig::default).url = url;
        }
        self
    }

    /// Check values serde cannot check
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workspace_table_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "workspaceTableName must not be empty".to_string(),
            ));
        }
        if self.workspace_cache_capacity == 0 {
            return Err(ConfigError::Invalid(
                "workspaceCacheCapacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the dimension source described by `contentDimensions`
    pub fn content_dimension_source(
        &self,
    ) -> Result<ConfigurationBasedContentDimensionSource, DimensionError> {
        ConfigurationBasedContentDimensionSource::from_configuration(&self.content_dimensions)
    }
}
