// Copyright 2025 Cowboy AI, LLC.

//! A content dimension: ordered values plus their specialization edges

use indexmap::IndexMap;
use std::collections::HashMap;

use super::errors::DimensionError;
use super::value::{
    lookup_path, ContentDimensionId, ContentDimensionValue,
    ContentDimensionValueSpecializationDepth, ContentDimensionValueVariationEdge,
};

/// One axis of content variation, e.g. `language`
///
/// Values form a forest: every value has at most one generalization, depth 0 marks the
/// roots and depth grows by exactly one along every specialization edge. Because depth
/// strictly increases along edges, a validated dimension cannot contain cycles.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentDimension {
    id: ContentDimensionId,
    values: IndexMap<String, ContentDimensionValue>,
    generalizations: HashMap<String, String>,
    specializations: IndexMap<String, Vec<String>>,
    root_value: String,
    configuration: serde_json::Map<String, serde_json::Value>,
}

impl ContentDimension {
    /// Create a dimension from its values and `(specialization, generalization)` edges
    pub fn new(
        id: ContentDimensionId,
        values: Vec<ContentDimensionValue>,
        edges: Vec<ContentDimensionValueVariationEdge>,
    ) -> Result<Self, DimensionError> {
        if values.is_empty() {
            return Err(DimensionError::ContentDimensionValuesAreMissing {
                dimension: id.to_string(),
            });
        }

        let mut indexed_values = IndexMap::with_capacity(values.len());
        for value in values {
            if indexed_values.contains_key(&value.value) {
                return Err(DimensionError::DuplicateContentDimensionValue {
                    dimension: id.to_string(),
                    value: value.value,
                });
            }
            indexed_values.insert(value.value.clone(), value);
        }

        let mut generalizations: HashMap<String, String> = HashMap::new();
        let mut specializations: IndexMap<String, Vec<String>> = IndexMap::new();
        for edge in edges {
            for endpoint in [&edge.specialization, &edge.generalization] {
                if !indexed_values.contains_key(endpoint) {
                    return Err(DimensionError::UnknownVariationEdgeValue {
                        dimension: id.to_string(),
                        value: endpoint.clone(),
                    });
                }
            }
            match generalizations.get(&edge.specialization) {
                Some(existing) if existing == &edge.generalization => continue,
                Some(_) => {
                    return Err(DimensionError::AmbiguousGeneralization {
                        dimension: id.to_string(),
                        value: edge.specialization,
                    })
                }
                None => {}
            }
            specializations
                .entry(edge.generalization.clone())
                .or_default()
                .push(edge.specialization.clone());
            generalizations.insert(edge.specialization, edge.generalization);
        }

        for value in indexed_values.values() {
            let expected = match generalizations.get(&value.value) {
                Some(generalization) => indexed_values[generalization]
                    .specialization_depth
                    .increment(),
                None => ContentDimensionValueSpecializationDepth::zero(),
            };
            if value.specialization_depth != expected {
                return Err(DimensionError::SpecializationDepthMismatch {
                    dimension: id.to_string(),
                    value: value.value.clone(),
                    expected: expected.value(),
                    actual: value.specialization_depth.value(),
                });
            }
        }

        // Depth checks above guarantee at least one depth-0 value exists.
        let root_value = indexed_values
            .values()
            .find(|value| value.specialization_depth.value() == 0)
            .map(|value| value.value.clone())
            .ok_or_else(|| {
                DimensionError::InvalidConfiguration(format!("dimension {id} has no root value"))
            })?;

        Ok(Self {
            id,
            values: indexed_values,
            generalizations,
            specializations,
            root_value,
            configuration: serde_json::Map::new(),
        })
    }

    /// Attach opaque dimension configuration
    pub fn with_configuration(
        mut self,
        configuration: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        self.configuration = configuration;
        self
    }

    /// The dimension identifier
    pub fn id(&self) -> &ContentDimensionId {
        &self.id
    }

    /// All values in declaration order
    pub fn values(&self) -> impl Iterator<Item = &ContentDimensionValue> {
        self.values.values()
    }

    /// Number of declared values
    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    /// Look up a value by its string
    pub fn get_value(&self, value: &str) -> Option<&ContentDimensionValue> {
        self.values.get(value)
    }

    /// The first declared most general value
    pub fn root_value(&self) -> &ContentDimensionValue {
        &self.values[&self.root_value]
    }

    /// Every value at depth 0
    pub fn root_values(&self) -> Vec<&ContentDimensionValue> {
        self.values
            .values()
            .filter(|value| value.specialization_depth.value() == 0)
            .collect()
    }

    /// The direct generalization of a value, `None` for roots and unknown values
    pub fn get_generalization(&self, value: &str) -> Option<&ContentDimensionValue> {
        self.generalizations
            .get(value)
            .and_then(|generalization| self.values.get(generalization))
    }

    /// The direct specializations of a value, in declaration order
    pub fn get_specializations(&self, value: &str) -> Vec<&ContentDimensionValue> {
        self.specializations
            .get(value)
            .map(|specializations| {
                specializations
                    .iter()
                    .filter_map(|specialization| self.values.get(specialization))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether `generalization` equals `specialization` or is reachable from it by
    /// following generalization edges
    pub fn is_generalization_of(&self, generalization: &str, specialization: &str) -> bool {
        let mut current = Some(specialization);
        while let Some(value) = current {
            if value == generalization {
                return true;
            }
            current = self.generalizations.get(value).map(String::as_str);
        }
        false
    }

    /// The deepest specialization depth of any value
    pub fn maximum_depth(&self) -> ContentDimensionValueSpecializationDepth {
        self.values
            .values()
            .map(|value| value.specialization_depth)
            .max()
            .unwrap_or_default()
    }

    /// All `(specialization, generalization)` edges
    pub fn variation_edges(&self) -> Vec<ContentDimensionValueVariationEdge> {
        self.specializations
            .iter()
            .flat_map(|(generalization, specializations)| {
                specializations.iter().map(move |specialization| {
                    ContentDimensionValueVariationEdge::new(
                        specialization.clone(),
                        generalization.clone(),
                    )
                })
            })
            .collect()
    }

    /// Read a dimension configuration entry by dotted path
    pub fn get_configuration_value(&self, path: &str) -> Option<&serde_json::Value> {
        lookup_path(&self.configuration, path)
    }
}
