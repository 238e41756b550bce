// Copyright 2025 Cowboy AI, LLC.

//! Dimension identifiers, values and the constraints between them

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::DimensionError;

/// Identifier of a content dimension, e.g. `language`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDimensionId(String);

impl ContentDimensionId {
    /// Create a dimension identifier, rejecting empty strings
    pub fn new(value: impl Into<String>) -> Result<Self, DimensionError> {
        let value = value.into();
        if value.is_empty() {
            return Err(DimensionError::EmptyDimensionId);
        }
        Ok(Self(value))
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentDimensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ContentDimensionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Distance of a value from the most general value of its dimension
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ContentDimensionValueSpecializationDepth(pub u32);

impl ContentDimensionValueSpecializationDepth {
    /// Depth of a root value
    pub const fn zero() -> Self {
        Self(0)
    }

    /// The depth one step further down the specialization chain
    pub fn increment(self) -> Self {
        Self(self.0 + 1)
    }

    /// Raw depth value
    pub fn value(self) -> u32 {
        self.0
    }
}

/// Restrictions a value places on the values of one other dimension
///
/// Explicit restrictions win over the wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDimensionConstraints {
    /// Whether values not listed in the restrictions may be combined
    pub is_wildcard_allowed: bool,
    /// Explicit allow (`true`) or deny (`false`) per value
    pub identifier_restrictions: IndexMap<String, bool>,
}

impl ContentDimensionConstraints {
    /// Create constraints from a wildcard flag and explicit restrictions
    pub fn new(is_wildcard_allowed: bool, identifier_restrictions: IndexMap<String, bool>) -> Self {
        Self {
            is_wildcard_allowed,
            identifier_restrictions,
        }
    }

    /// Check whether combination with the given value of the constrained dimension is allowed
    pub fn allows_combination_with(&self, value: &str) -> bool {
        self.identifier_restrictions
            .get(value)
            .copied()
            .unwrap_or(self.is_wildcard_allowed)
    }
}

impl Default for ContentDimensionConstraints {
    fn default() -> Self {
        Self::new(true, IndexMap::new())
    }
}

/// Constraints of one value, indexed by the dimension they restrict
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDimensionConstraintSet(IndexMap<ContentDimensionId, ContentDimensionConstraints>);

impl ContentDimensionConstraintSet {
    /// Create a constraint set
    pub fn new(constraints: IndexMap<ContentDimensionId, ContentDimensionConstraints>) -> Self {
        Self(constraints)
    }

    /// A constraint set allowing everything
    pub fn create_empty() -> Self {
        Self::default()
    }

    /// Constraints on the given dimension, if any
    pub fn get_constraints(
        &self,
        dimension_id: &ContentDimensionId,
    ) -> Option<&ContentDimensionConstraints> {
        self.0.get(dimension_id)
    }

    /// Check whether a value of another dimension may be combined with the owner of this set
    pub fn allows_combination_with(&self, dimension_id: &ContentDimensionId, value: &str) -> bool {
        self.0
            .get(dimension_id)
            .map(|constraints| constraints.allows_combination_with(value))
            .unwrap_or(true)
    }

    /// Whether no constraints are declared
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A single value of a content dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDimensionValue {
    /// The value string, unique within its dimension
    pub value: String,
    /// Distance from the dimension's most general value
    pub specialization_depth: ContentDimensionValueSpecializationDepth,
    /// Restrictions on combinations with other dimensions
    #[serde(default)]
    pub constraints: ContentDimensionConstraintSet,
    /// Opaque configuration carried along with the value
    #[serde(default)]
    pub configuration: serde_json::Map<String, serde_json::Value>,
}

impl ContentDimensionValue {
    /// Create an unconstrained value at the given depth
    pub fn new(value: impl Into<String>, depth: u32) -> Self {
        Self {
            value: value.into(),
            specialization_depth: ContentDimensionValueSpecializationDepth(depth),
            constraints: ContentDimensionConstraintSet::create_empty(),
            configuration: serde_json::Map::new(),
        }
    }

    /// Replace the constraints of this value
    pub fn with_constraints(mut self, constraints: ContentDimensionConstraintSet) -> Self {
        self.constraints = constraints;
        self
    }

    /// Replace the opaque configuration of this value
    pub fn with_configuration(
        mut self,
        configuration: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        self.configuration = configuration;
        self
    }

    /// Constraints this value places on another dimension
    pub fn get_constraints(
        &self,
        dimension_id: &ContentDimensionId,
    ) -> Option<&ContentDimensionConstraints> {
        self.constraints.get_constraints(dimension_id)
    }

    /// Check whether this value may be combined with `value` of `dimension_id`
    pub fn can_be_combined_with(&self, dimension_id: &ContentDimensionId, value: &str) -> bool {
        self.constraints.allows_combination_with(dimension_id, value)
    }

    /// Read a configuration entry by dotted path, e.g. `resolution.value`
    pub fn get_configuration_value(&self, path: &str) -> Option<&serde_json::Value> {
        lookup_path(&self.configuration, path)
    }
}

impl fmt::Display for ContentDimensionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Directed edge from a specialization to its generalization
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDimensionValueVariationEdge {
    /// The more specific value
    pub specialization: String,
    /// The more general value
    pub generalization: String,
}

impl ContentDimensionValueVariationEdge {
    /// Create an edge
    pub fn new(specialization: impl Into<String>, generalization: impl Into<String>) -> Self {
        Self {
            specialization: specialization.into(),
            generalization: generalization.into(),
        }
    }
}

pub(crate) fn lookup_path<'a>(
    configuration: &'a serde_json::Map<String, serde_json::Value>,
    path: &str,
) -> Option<&'a serde_json::Value> {
    let mut segments = path.split('.');
    let mut current = configuration.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_restrictions_win_over_wildcard() {
        let mut restrictions = IndexMap::new();
        restrictions.insert("valueB1".to_string(), true);
        restrictions.insert("valueB2".to_string(), false);
        let constraints = ContentDimensionConstraints::new(false, restrictions);

        assert!(constraints.allows_combination_with("valueB1"));
        assert!(!constraints.allows_combination_with("valueB2"));
        assert!(!constraints.allows_combination_with("valueB3"));
    }

    #[test]
    fn unconstrained_dimensions_are_allowed() {
        let dimension = ContentDimensionId::new("language").unwrap();
        let value = ContentDimensionValue::new("de", 0);
        assert!(value.can_be_combined_with(&dimension, "anything"));
    }

    #[test]
    fn empty_dimension_id_is_rejected() {
        assert_eq!(
            ContentDimensionId::new(""),
            Err(DimensionError::EmptyDimensionId)
        );
    }

    #[test]
    fn configuration_is_read_by_dotted_path() {
        let configuration = serde_json::json!({"resolution": {"value": "de"}});
        let value = ContentDimensionValue::new("de", 0)
            .with_configuration(configuration.as_object().cloned().unwrap());

        assert_eq!(
            value.get_configuration_value("resolution.value"),
            Some(&serde_json::json!("de"))
        );
        assert_eq!(value.get_configuration_value("resolution.missing"), None);
    }
}
