// Copyright 2025 Cowboy AI, LLC.

//! Variation weights: per-dimension specialization depths

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::DimensionSpaceError;
use crate::dimension::{ContentDimensionId, ContentDimensionValueSpecializationDepth};

/// The specialization depth of a point in every dimension, in priority order
///
/// Component order is significant: normalization treats the first component as the
/// most significant digit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentSubgraphVariationWeight {
    components: Vec<(ContentDimensionId, ContentDimensionValueSpecializationDepth)>,
}

impl ContentSubgraphVariationWeight {
    /// Create a weight from components in priority order
    pub fn new(
        components: impl IntoIterator<Item = (ContentDimensionId, ContentDimensionValueSpecializationDepth)>,
    ) -> Self {
        Self {
            components: components.into_iter().collect(),
        }
    }

    /// Components in priority order
    pub fn components(&self) -> &[(ContentDimensionId, ContentDimensionValueSpecializationDepth)] {
        &self.components
    }

    /// Depth of one dimension
    pub fn get(&self, dimension: &ContentDimensionId) -> Option<ContentDimensionValueSpecializationDepth> {
        self.components
            .iter()
            .find(|(id, _)| id == dimension)
            .map(|(_, depth)| *depth)
    }

    /// Whether both weights cover exactly the same dimensions
    pub fn can_be_compared_to(&self, other: &ContentSubgraphVariationWeight) -> bool {
        self.components.len() == other.components.len()
            && self
                .components
                .iter()
                .all(|(id, _)| other.get(id).is_some())
    }

    /// Subtract `other` component-wise
    ///
    /// Fails if the weights cover different dimensions or if any component would go
    /// negative.
    pub fn decrease_by(
        &self,
        other: &ContentSubgraphVariationWeight,
    ) -> Result<ContentSubgraphVariationWeight, DimensionSpaceError> {
        if !self.can_be_compared_to(other) {
            return Err(DimensionSpaceError::VariationWeightsAreIncomparable {
                left: self.to_string(),
                right: other.to_string(),
            });
        }

        let mut components = Vec::with_capacity(self.components.len());
        for (id, depth) in &self.components {
            let subtrahend = other.get(id).unwrap_or_default();
            let difference = i64::from(depth.value()) - i64::from(subtrahend.value());
            if difference < 0 {
                return Err(DimensionSpaceError::SpecializationDepthIsInvalid {
                    dimension: id.to_string(),
                    depth: difference,
                });
            }
            components.push((
                id.clone(),
                ContentDimensionValueSpecializationDepth(depth.value() - subtrahend.value()),
            ));
        }
        Ok(Self { components })
    }

    /// Collapse the weight into one integer using `base` as radix
    ///
    /// With `base` greater than every depth this is injective and ordered by the
    /// highest-priority dimension first.
    pub fn normalize(&self, base: u32) -> u64 {
        self.components.iter().fold(0u64, |acc, (_, depth)| {
            acc.saturating_mul(u64::from(base))
                .saturating_add(u64::from(depth.value()))
        })
    }

    /// Sum of all components
    pub fn total_depth(&self) -> u64 {
        self.components
            .iter()
            .map(|(_, depth)| u64::from(depth.value()))
            .sum()
    }

    /// Whether every component is zero
    pub fn is_zero(&self) -> bool {
        self.components.iter().all(|(_, depth)| depth.value() == 0)
    }
}

impl fmt::Display for ContentSubgraphVariationWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (index, (id, depth)) in self.components.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{id}: {}", depth.value())?;
        }
        write!(f, "}}")
    }
}
