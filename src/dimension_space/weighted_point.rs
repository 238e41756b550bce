// Copyright 2025 Cowboy AI, LLC.

//! Dimension space points enriched with their dimension values and weight

use indexmap::IndexMap;

use super::dimension_space_point::DimensionSpacePoint;
use super::weight::ContentSubgraphVariationWeight;
use crate::dimension::{ContentDimensionId, ContentDimensionValue};

/// A point of the allowed subspace together with its full dimension values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedDimensionSpacePoint {
    dimension_values: IndexMap<ContentDimensionId, ContentDimensionValue>,
    dimension_space_point: DimensionSpacePoint,
    weight: ContentSubgraphVariationWeight,
    identity_hash: String,
}

impl WeightedDimensionSpacePoint {
    /// Create a weighted point from dimension values in priority order
    pub fn new(dimension_values: IndexMap<ContentDimensionId, ContentDimensionValue>) -> Self {
        let dimension_space_point = DimensionSpacePoint::new(
            dimension_values
                .iter()
                .map(|(id, value)| (id.to_string(), value.value.clone())),
        );
        let weight = ContentSubgraphVariationWeight::new(
            dimension_values
                .iter()
                .map(|(id, value)| (id.clone(), value.specialization_depth)),
        );

        let mut hasher = blake3::Hasher::new();
        hasher.update(b"weighted");
        for (id, value) in &dimension_values {
            for part in [id.as_str(), value.value.as_str()] {
                hasher.update(&(part.len() as u64).to_le_bytes());
                hasher.update(part.as_bytes());
            }
            hasher.update(&value.specialization_depth.value().to_le_bytes());
        }

        Self {
            dimension_values,
            dimension_space_point,
            weight,
            identity_hash: hasher.finalize().to_hex().to_string(),
        }
    }

    /// Dimension values in priority order
    pub fn dimension_values(&self) -> &IndexMap<ContentDimensionId, ContentDimensionValue> {
        &self.dimension_values
    }

    /// The value of one dimension
    pub fn get_dimension_value(&self, id: &ContentDimensionId) -> Option<&ContentDimensionValue> {
        self.dimension_values.get(id)
    }

    /// The plain point
    pub fn dimension_space_point(&self) -> &DimensionSpacePoint {
        &self.dimension_space_point
    }

    /// Hash of the plain point
    pub fn hash(&self) -> &str {
        self.dimension_space_point.hash()
    }

    /// Hash over values and depths, distinct from the plain point hash
    pub fn identity_hash(&self) -> &str {
        &self.identity_hash
    }

    /// Specialization depths in priority order
    pub fn weight(&self) -> &ContentSubgraphVariationWeight {
        &self.weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_and_weight_follow_values() {
        let language = ContentDimensionId::new("language").unwrap();
        let market = ContentDimensionId::new("market").unwrap();
        let point = WeightedDimensionSpacePoint::new(IndexMap::from([
            (language.clone(), ContentDimensionValue::new("en_US", 1)),
            (market.clone(), ContentDimensionValue::new("US", 0)),
        ]));

        assert_eq!(
            point.dimension_space_point(),
            &DimensionSpacePoint::new([("language", "en_US"), ("market", "US")])
        );
        assert_eq!(point.weight().get(&language).unwrap().value(), 1);
        assert_eq!(point.weight().get(&market).unwrap().value(), 0);
        assert_eq!(point.get_dimension_value(&market).unwrap().value, "US");
        assert_ne!(point.identity_hash(), point.hash());
    }
}
