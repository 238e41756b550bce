// Copyright 2025 Cowboy AI, LLC.

//! Supplying the ordered content dimensions of a repository

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::content_dimension::ContentDimension;
use super::errors::DimensionError;
use super::value::{
    ContentDimensionConstraintSet, ContentDimensionConstraints, ContentDimensionId,
    ContentDimensionValue, ContentDimensionValueVariationEdge,
};

/// Key in a constraint block that sets the default for unlisted values
pub const WILDCARD_CONSTRAINT_KEY: &str = "*";

/// Source of the content dimensions configured for a repository
///
/// Dimensions are returned in priority order; the first dimension is the most significant
/// one when variation weights are normalized.
#[cfg_attr(test, mockall::automock)]
pub trait ContentDimensionSource: Send + Sync {
    /// Look up a single dimension
    fn get_dimension(&self, id: &ContentDimensionId) -> Option<ContentDimension>;

    /// All dimensions, highest priority first
    fn get_content_dimensions_ordered_by_priority(&self) -> Vec<ContentDimension>;
}

/// Raw dimension configuration: dimension identifier to dimension block, in priority order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionsConfiguration(pub IndexMap<String, DimensionConfiguration>);

/// Configuration block of one dimension
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionConfiguration {
    /// Top-level (root) values, each possibly carrying nested specializations
    #[serde(default)]
    pub values: IndexMap<String, DimensionValueConfiguration>,
    /// Everything else, kept as opaque dimension configuration
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Configuration block of one dimension value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionValueConfiguration {
    /// Constraints per other dimension; `"*"` sets the wildcard
    #[serde(default)]
    pub constraints: IndexMap<String, IndexMap<String, bool>>,
    /// Nested, more specific values
    #[serde(default)]
    pub specializations: IndexMap<String, DimensionValueConfiguration>,
    /// Everything else, kept as opaque value configuration
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Dimension source backed by static configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigurationBasedContentDimensionSource {
    dimensions: IndexMap<ContentDimensionId, ContentDimension>,
}

impl ConfigurationBasedContentDimensionSource {
    /// Create a source from already assembled dimensions, in priority order
    pub fn from_dimensions(dimensions: Vec<ContentDimension>) -> Result<Self, DimensionError> {
        let mut indexed = IndexMap::with_capacity(dimensions.len());
        for dimension in dimensions {
            let id = dimension.id().clone();
            if indexed.insert(id.clone(), dimension).is_some() {
                return Err(DimensionError::InvalidConfiguration(format!(
                    "dimension {id} is declared more than once"
                )));
            }
        }
        Ok(Self { dimensions: indexed })
    }

    /// Create a source from raw configuration
    pub fn from_configuration(
        configuration: &DimensionsConfiguration,
    ) -> Result<Self, DimensionError> {
        let mut dimensions = Vec::with_capacity(configuration.0.len());
        for (raw_id, dimension_configuration) in &configuration.0 {
            let id = ContentDimensionId::new(raw_id.clone())?;
            let mut values = Vec::new();
            let mut edges = Vec::new();
            for (value, value_configuration) in &dimension_configuration.values {
                collect_values(value, value_configuration, None, 0, &mut values, &mut edges)?;
            }
            debug!(
                dimension = %id,
                values = values.len(),
                edges = edges.len(),
                "Configured content dimension"
            );
            let dimension = ContentDimension::new(id, values, edges)?
                .with_configuration(dimension_configuration.extra.clone());
            dimensions.push(dimension);
        }
        Self::from_dimensions(dimensions)
    }

    /// Create a source from a JSON configuration document
    pub fn from_json_str(json: &str) -> Result<Self, DimensionError> {
        let configuration: DimensionsConfiguration = serde_json::from_str(json)?;
        Self::from_configuration(&configuration)
    }

    /// Borrow a dimension without cloning it
    pub fn dimension(&self, id: &ContentDimensionId) -> Option<&ContentDimension> {
        self.dimensions.get(id)
    }

    /// Whether no dimensions are configured
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }
}

impl ContentDimensionSource for ConfigurationBasedContentDimensionSource {
    fn get_dimension(&self, id: &ContentDimensionId) -> Option<ContentDimension> {
        self.dimensions.get(id).cloned()
    }

    fn get_content_dimensions_ordered_by_priority(&self) -> Vec<ContentDimension> {
        self.dimensions.values().cloned().collect()
    }
}

fn collect_values(
    value: &str,
    configuration: &DimensionValueConfiguration,
    generalization: Option<&str>,
    depth: u32,
    values: &mut Vec<ContentDimensionValue>,
    edges: &mut Vec<ContentDimensionValueVariationEdge>,
) -> Result<(), DimensionError> {
    let mut constraints = IndexMap::new();
    for (raw_dimension_id, restrictions) in &configuration.constraints {
        let mut identifier_restrictions = restrictions.clone();
        let is_wildcard_allowed = identifier_restrictions
            .shift_remove(WILDCARD_CONSTRAINT_KEY)
            .unwrap_or(true);
        constraints.insert(
            ContentDimensionId::new(raw_dimension_id.clone())?,
            ContentDimensionConstraints::new(is_wildcard_allowed, identifier_restrictions),
        );
    }

    values.push(
        ContentDimensionValue::new(value, depth)
            .with_constraints(ContentDimensionConstraintSet::new(constraints))
            .with_configuration(configuration.extra.clone()),
    );
    if let Some(generalization) = generalization {
        edges.push(ContentDimensionValueVariationEdge::new(value, generalization));
    }

    for (specialization, specialization_configuration) in &configuration.specializations {
        collect_values(
            specialization,
            specialization_configuration,
            Some(value),
            depth + 1,
            values,
            edges,
        )?;
    }
    Ok(())
}
