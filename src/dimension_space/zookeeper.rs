// Copyright 2025 Cowboy AI, LLC.

//! The allowed dimension subspace
//!
//! Not every combination of dimension values makes sense: a value may forbid being
//! combined with certain values of another dimension. The zookeeper computes the
//! constrained cartesian product once and answers membership questions afterwards.

use indexmap::IndexMap;
use tracing::debug;

use super::dimension_space_point::{DimensionSpacePoint, DimensionSpacePointSet};
use super::errors::DimensionSpaceError;
use crate::dimension::{ContentDimension, ContentDimensionId, ContentDimensionSource, ContentDimensionValue};

/// One allowed combination: dimension values in priority order
pub type DimensionValueCombination = IndexMap<ContentDimensionId, ContentDimensionValue>;

/// Keeper of the allowed dimension subspace
#[derive(Debug, Clone)]
pub struct ContentDimensionZookeeper {
    allowed_combinations: Vec<DimensionValueCombination>,
    allowed_dimension_subspace: DimensionSpacePointSet,
}

impl ContentDimensionZookeeper {
    /// Compute the allowed subspace of the given source
    pub fn new(source: &dyn ContentDimensionSource) -> Self {
        Self::from_dimensions(&source.get_content_dimensions_ordered_by_priority())
    }

    /// Compute the allowed subspace of dimensions in priority order
    ///
    /// Without any dimensions the subspace holds exactly the empty point.
    pub fn from_dimensions(dimensions: &[ContentDimension]) -> Self {
        let mut combinations: Vec<DimensionValueCombination> = vec![IndexMap::new()];
        for dimension in dimensions {
            let mut extended = Vec::with_capacity(combinations.len() * dimension.value_count());
            for combination in &combinations {
                for value in dimension.values() {
                    if is_combination_allowed(combination, dimension.id(), value) {
                        let mut next = combination.clone();
                        next.insert(dimension.id().clone(), value.clone());
                        extended.push(next);
                    }
                }
            }
            combinations = extended;
        }

        let allowed_dimension_subspace = combinations
            .iter()
            .map(|combination| {
                DimensionSpacePoint::new(
                    combination
                        .iter()
                        .map(|(id, value)| (id.to_string(), value.value.clone())),
                )
            })
            .collect::<DimensionSpacePointSet>();

        debug!(
            dimensions = dimensions.len(),
            allowed_points = allowed_dimension_subspace.len(),
            "Computed allowed dimension subspace"
        );

        Self {
            allowed_combinations: combinations,
            allowed_dimension_subspace,
        }
    }

    /// All allowed combinations with full dimension values
    pub fn allowed_combinations(&self) -> &[DimensionValueCombination] {
        &self.allowed_combinations
    }

    /// All allowed points
    pub fn allowed_dimension_subspace(&self) -> &DimensionSpacePointSet {
        &self.allowed_dimension_subspace
    }

    /// Whether the point is allowed
    pub fn contains(&self, point: &DimensionSpacePoint) -> bool {
        self.allowed_dimension_subspace.contains(point)
    }

    /// Fail if the point is not allowed
    pub fn ensure_allowed(&self, point: &DimensionSpacePoint) -> Result<(), DimensionSpaceError> {
        if self.contains(point) {
            Ok(())
        } else {
            Err(DimensionSpaceError::point_not_found(point))
        }
    }
}

fn is_combination_allowed(
    combination: &DimensionValueCombination,
    dimension_id: &ContentDimensionId,
    value: &ContentDimensionValue,
) -> bool {
    combination.iter().all(|(other_id, other_value)| {
        other_value.can_be_combined_with(dimension_id, &value.value)
            && value.can_be_combined_with(other_id, &other_value.value)
    })
}
