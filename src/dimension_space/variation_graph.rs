// Copyright 2025 Cowboy AI, LLC.

//! The inter-dimensional variation graph
//!
//! For every point of the allowed subspace the graph knows all of its generalizations and
//! specializations, the weight separating them and a single primary generalization used
//! as fallback. Everything is computed once, eagerly, and never mutated afterwards.
//!
//! ```mermaid
//! graph TD
//!     root["{language: en, market: US}"] --> a["{language: en_US, market: US}"]
//!     root --> b["{language: en_GB, market: US}"]
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::info;

use super::dimension_space_point::{DimensionSpacePoint, DimensionSpacePointSet};
use super::errors::DimensionSpaceError;
use super::weight::ContentSubgraphVariationWeight;
use super::weighted_point::WeightedDimensionSpacePoint;
use super::zookeeper::ContentDimensionZookeeper;
use crate::dimension::{ContentDimension, ContentDimensionId, ContentDimensionSource};

/// How one point relates to another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariantType {
    /// Identical coordinates
    Same,
    /// The subject is more specific than the object
    Specialization,
    /// The subject is more general than the object
    Generalization,
    /// Neither is reachable from the other
    Peer,
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VariantType::Same => "same",
            VariantType::Specialization => "specialization",
            VariantType::Generalization => "generalization",
            VariantType::Peer => "peer",
        };
        write!(f, "{name}")
    }
}

/// Weighted points of the allowed subspace, keyed by point hash
pub type WeightedDimensionSpacePoints = IndexMap<String, WeightedDimensionSpacePoint>;

/// Precomputed generalization and specialization indices, keyed by point hash
#[derive(Debug, Clone, Default)]
pub struct VariationIndex {
    indexed_generalizations: HashMap<String, DimensionSpacePointSet>,
    indexed_specializations: HashMap<String, DimensionSpacePointSet>,
    weighted_generalizations: HashMap<String, BTreeMap<u64, DimensionSpacePoint>>,
    weighted_specializations: HashMap<String, BTreeMap<u64, DimensionSpacePointSet>>,
    primary_generalizations: HashMap<String, DimensionSpacePoint>,
}

impl VariationIndex {
    /// All generalizations of the point with the given hash
    pub fn indexed_generalizations(&self, hash: &str) -> Option<&DimensionSpacePointSet> {
        self.indexed_generalizations.get(hash)
    }

    /// All specializations of the point with the given hash
    pub fn indexed_specializations(&self, hash: &str) -> Option<&DimensionSpacePointSet> {
        self.indexed_specializations.get(hash)
    }

    /// Generalizations by normalized weight
    pub fn weighted_generalizations(&self, hash: &str) -> Option<&BTreeMap<u64, DimensionSpacePoint>> {
        self.weighted_generalizations.get(hash)
    }

    /// Specializations by normalized weight
    pub fn weighted_specializations(
        &self,
        hash: &str,
    ) -> Option<&BTreeMap<u64, DimensionSpacePointSet>> {
        self.weighted_specializations.get(hash)
    }

    /// The primary generalization, absent for roots
    pub fn primary_generalization(&self, hash: &str) -> Option<&DimensionSpacePoint> {
        self.primary_generalizations.get(hash)
    }
}

/// `1 + ` the deepest specialization depth of any dimension, `0` without dimensions
pub fn determine_weight_normalization_base(dimensions: &[ContentDimension]) -> u32 {
    dimensions
        .iter()
        .map(|dimension| dimension.maximum_depth().value() + 1)
        .max()
        .unwrap_or(0)
}

/// Attach dimension values and weights to every point of the subspace
pub fn build_weighted_points(
    subspace: &DimensionSpacePointSet,
    dimensions: &[ContentDimension],
) -> Result<WeightedDimensionSpacePoints, DimensionSpaceError> {
    let mut weighted_points = IndexMap::with_capacity(subspace.len());
    for point in subspace {
        let mut dimension_values = IndexMap::with_capacity(dimensions.len());
        for dimension in dimensions {
            let coordinate = point
                .coordinate(dimension.id().as_str())
                .ok_or_else(|| DimensionSpaceError::point_not_found(point))?;
            let value = dimension.get_value(coordinate).ok_or_else(|| {
                DimensionSpaceError::DimensionValueNotFound {
                    dimension: dimension.id().to_string(),
                    value: coordinate.to_string(),
                }
            })?;
            dimension_values.insert(dimension.id().clone(), value.clone());
        }
        if dimension_values.len() != point.len() {
            return Err(DimensionSpaceError::point_not_found(point));
        }
        weighted_points.insert(
            point.hash().to_string(),
            WeightedDimensionSpacePoint::new(dimension_values),
        );
    }
    Ok(weighted_points)
}

/// Relate every pair of weighted points and derive the indices
///
/// This is a full all-pairs pass; the subspace is a product of configured axes and stays
/// small.
pub fn build_variation_index(
    weighted_points: &WeightedDimensionSpacePoints,
    dimensions: &[ContentDimension],
) -> Result<VariationIndex, DimensionSpaceError> {
    let base = determine_weight_normalization_base(dimensions);
    let dimensions_by_id: HashMap<&ContentDimensionId, &ContentDimension> = dimensions
        .iter()
        .map(|dimension| (dimension.id(), dimension))
        .collect();

    let mut index = VariationIndex::default();
    for specialization in weighted_points.values() {
        let mut primary: Option<PrimaryCandidate<'_>> = None;
        for generalization in weighted_points.values() {
            if generalization.hash() == specialization.hash()
                || !is_generalization(generalization, specialization, &dimensions_by_id)
            {
                continue;
            }

            let weight = specialization.weight().decrease_by(generalization.weight())?;
            let normalized_weight = weight.normalize(base);
            let specialization_point = specialization.dimension_space_point();
            let generalization_point = generalization.dimension_space_point();

            index
                .indexed_generalizations
                .entry(specialization.hash().to_string())
                .or_default()
                .insert(generalization_point.clone());
            index
                .weighted_generalizations
                .entry(specialization.hash().to_string())
                .or_default()
                .insert(normalized_weight, generalization_point.clone());
            index
                .indexed_specializations
                .entry(generalization.hash().to_string())
                .or_default()
                .insert(specialization_point.clone());
            index
                .weighted_specializations
                .entry(generalization.hash().to_string())
                .or_default()
                .entry(normalized_weight)
                .or_default()
                .insert(specialization_point.clone());

            let candidate = PrimaryCandidate {
                normalized_weight,
                weight,
                point: generalization_point,
            };
            if primary
                .as_ref()
                .map_or(true, |current| candidate.cmp_preference(current) == Ordering::Less)
            {
                primary = Some(candidate);
            }
        }
        if let Some(primary) = primary {
            index
                .primary_generalizations
                .insert(specialization.hash().to_string(), primary.point.clone());
        }
    }
    Ok(index)
}

/// Whether `generalization` generalizes `specialization` in every dimension
fn is_generalization(
    generalization: &WeightedDimensionSpacePoint,
    specialization: &WeightedDimensionSpacePoint,
    dimensions_by_id: &HashMap<&ContentDimensionId, &ContentDimension>,
) -> bool {
    if generalization.dimension_values().len() != specialization.dimension_values().len() {
        return false;
    }
    specialization
        .dimension_values()
        .iter()
        .all(|(id, specialization_value)| {
            match (
                generalization.get_dimension_value(id),
                dimensions_by_id.get(id),
            ) {
                (Some(generalization_value), Some(dimension)) => dimension
                    .is_generalization_of(&generalization_value.value, &specialization_value.value),
                _ => false,
            }
        })
}

struct PrimaryCandidate<'a> {
    normalized_weight: u64,
    weight: ContentSubgraphVariationWeight,
    point: &'a DimensionSpacePoint,
}

impl PrimaryCandidate<'_> {
    /// `Less` means `self` is preferred over `other`
    fn cmp_preference(&self, other: &Self) -> Ordering {
        self.normalized_weight
            .cmp(&other.normalized_weight)
            .then_with(|| self.weight.total_depth().cmp(&other.weight.total_depth()))
            .then_with(|| {
                // Stepping up in a higher priority dimension wins.
                let own = self.weight.components().iter().map(|(_, depth)| *depth);
                let others = other.weight.components().iter().map(|(_, depth)| *depth);
                others.cmp(own)
            })
            .then_with(|| self.point.cmp(other.point))
    }
}

/// The variation graph over the allowed dimension subspace
#[derive(Debug, Clone)]
pub struct InterDimensionalVariationGraph {
    dimensions: Vec<ContentDimension>,
    allowed_subspace: DimensionSpacePointSet,
    weighted_points: WeightedDimensionSpacePoints,
    index: VariationIndex,
    weight_normalization_base: u32,
}

impl InterDimensionalVariationGraph {
    /// Build the graph for a source and its zookeeper
    pub fn new(
        source: &dyn ContentDimensionSource,
        zookeeper: &ContentDimensionZookeeper,
    ) -> Result<Self, DimensionSpaceError> {
        let dimensions = source.get_content_dimensions_ordered_by_priority();
        let allowed_subspace = zookeeper.allowed_dimension_subspace().clone();
        let weighted_points = build_weighted_points(&allowed_subspace, &dimensions)?;
        let index = build_variation_index(&weighted_points, &dimensions)?;
        let weight_normalization_base = determine_weight_normalization_base(&dimensions);

        info!(
            dimensions = dimensions.len(),
            points = weighted_points.len(),
            weight_normalization_base,
            "Built inter-dimensional variation graph"
        );

        Ok(Self {
            dimensions,
            allowed_subspace,
            weighted_points,
            index,
            weight_normalization_base,
        })
    }

    /// Build the graph for a source, computing the allowed subspace on the way
    pub fn from_source(source: &dyn ContentDimensionSource) -> Result<Self, DimensionSpaceError> {
        let zookeeper = ContentDimensionZookeeper::new(source);
        Self::new(source, &zookeeper)
    }

    /// Dimensions in priority order
    pub fn dimensions(&self) -> &[ContentDimension] {
        &self.dimensions
    }

    /// Every point of the allowed subspace
    pub fn get_dimension_space_points(&self) -> &DimensionSpacePointSet {
        &self.allowed_subspace
    }

    /// Every weighted point, keyed by point hash
    pub fn get_weighted_dimension_space_points(&self) -> &WeightedDimensionSpacePoints {
        &self.weighted_points
    }

    /// The weighted form of a point, `None` outside the allowed subspace
    pub fn get_weighted_dimension_space_point_by_dimension_space_point(
        &self,
        point: &DimensionSpacePoint,
    ) -> Option<&WeightedDimensionSpacePoint> {
        self.weighted_points.get(point.hash())
    }

    /// The weighted form of the point with the given hash
    pub fn get_weighted_dimension_space_point_by_hash(
        &self,
        hash: &str,
    ) -> Option<&WeightedDimensionSpacePoint> {
        self.weighted_points.get(hash)
    }

    /// Points without any generalization
    pub fn get_root_generalizations(&self) -> DimensionSpacePointSet {
        self.allowed_subspace
            .iter()
            .filter(|point| self.index.indexed_generalizations(point.hash()).is_none())
            .cloned()
            .collect()
    }

    /// Radix used to normalize weights
    pub fn weight_normalization_base(&self) -> u32 {
        self.weight_normalization_base
    }

    /// The raw indices
    pub fn index(&self) -> &VariationIndex {
        &self.index
    }

    /// Whether the point is part of the allowed subspace
    pub fn contains(&self, point: &DimensionSpacePoint) -> bool {
        self.allowed_subspace.contains(point)
    }

    fn ensure_known(&self, point: &DimensionSpacePoint) -> Result<(), DimensionSpaceError> {
        if self.contains(point) {
            Ok(())
        } else {
            Err(DimensionSpaceError::point_not_found(point))
        }
    }

    /// All generalizations of a point
    pub fn get_indexed_generalizations(
        &self,
        point: &DimensionSpacePoint,
    ) -> Result<DimensionSpacePointSet, DimensionSpaceError> {
        self.ensure_known(point)?;
        Ok(self
            .index
            .indexed_generalizations(point.hash())
            .cloned()
            .unwrap_or_default())
    }

    /// All specializations of a point
    pub fn get_indexed_specializations(
        &self,
        point: &DimensionSpacePoint,
    ) -> Result<DimensionSpacePointSet, DimensionSpaceError> {
        self.ensure_known(point)?;
        Ok(self
            .index
            .indexed_specializations(point.hash())
            .cloned()
            .unwrap_or_default())
    }

    /// Generalizations of a point by normalized weight, nearest first
    pub fn get_weighted_generalizations(
        &self,
        point: &DimensionSpacePoint,
    ) -> Result<BTreeMap<u64, DimensionSpacePoint>, DimensionSpaceError> {
        self.ensure_known(point)?;
        Ok(self
            .index
            .weighted_generalizations(point.hash())
            .cloned()
            .unwrap_or_default())
    }

    /// Specializations of a point by normalized weight, nearest first
    pub fn get_weighted_specializations(
        &self,
        point: &DimensionSpacePoint,
    ) -> Result<BTreeMap<u64, DimensionSpacePointSet>, DimensionSpaceError> {
        self.ensure_known(point)?;
        Ok(self
            .index
            .weighted_specializations(point.hash())
            .cloned()
            .unwrap_or_default())
    }

    /// The specializations of `origin`, optionally including `origin` itself
    ///
    /// Specializations contained in `excluded` are left out.
    pub fn get_specialization_set(
        &self,
        origin: &DimensionSpacePoint,
        include_origin: bool,
        excluded: Option<&DimensionSpacePointSet>,
    ) -> Result<DimensionSpacePointSet, DimensionSpaceError> {
        self.ensure_known(origin)?;
        let mut specialization_set = DimensionSpacePointSet::default();
        if include_origin {
            specialization_set.insert(origin.clone());
        }

        let Some(specializations) = self.index.indexed_specializations(origin.hash()) else {
            return Ok(specialization_set);
        };
        for specialization in specializations {
            if !excluded.is_some_and(|excluded| excluded.contains(specialization)) {
                specialization_set.insert(specialization.clone());
            }
        }
        Ok(specialization_set)
    }

    /// The primary generalization of a point, `None` for roots
    pub fn get_primary_generalization(
        &self,
        point: &DimensionSpacePoint,
    ) -> Result<Option<DimensionSpacePoint>, DimensionSpaceError> {
        self.ensure_known(point)?;
        Ok(self.index.primary_generalization(point.hash()).cloned())
    }

    /// How `subject` relates to `object`
    pub fn get_variant_type(
        &self,
        subject: &DimensionSpacePoint,
        object: &DimensionSpacePoint,
    ) -> Result<VariantType, DimensionSpaceError> {
        self.ensure_known(subject)?;
        self.ensure_known(object)?;

        if subject == object {
            return Ok(VariantType::Same);
        }
        let is_in = |index: Option<&DimensionSpacePointSet>| {
            index.is_some_and(|points| points.contains(subject))
        };
        if is_in(self.index.indexed_generalizations(object.hash())) {
            Ok(VariantType::Generalization)
        } else if is_in(self.index.indexed_specializations(object.hash())) {
            Ok(VariantType::Specialization)
        } else {
            Ok(VariantType::Peer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::{
        ContentDimensionValue, ContentDimensionValueVariationEdge, MockContentDimensionSource,
    };
    use pretty_assertions::assert_eq;

    fn chain(id: &str, depth: u32) -> ContentDimension {
        let values = (0..=depth)
            .map(|level| ContentDimensionValue::new(format!("{id}{level}"), level))
            .collect();
        let edges = (1..=depth)
            .map(|level| {
                ContentDimensionValueVariationEdge::new(
                    format!("{id}{level}"),
                    format!("{id}{}", level - 1),
                )
            })
            .collect();
        ContentDimension::new(ContentDimensionId::new(id).unwrap(), values, edges).unwrap()
    }

    #[test]
    fn normalization_base_is_one_above_the_deepest_value() {
        let mut source = MockContentDimensionSource::new();
        source
            .expect_get_content_dimensions_ordered_by_priority()
            .return_const(vec![chain("a", 3), chain("b", 5)]);

        let graph = InterDimensionalVariationGraph::from_source(&source).unwrap();

        assert_eq!(graph.weight_normalization_base(), 6);
        assert_eq!(graph.get_dimension_space_points().len(), 24);
    }

    #[test]
    fn normalization_base_without_dimensions_is_zero() {
        assert_eq!(determine_weight_normalization_base(&[]), 0);
    }

    #[test]
    fn chain_points_prefer_the_nearest_generalization() {
        let dimensions = vec![chain("a", 2)];
        let zookeeper = ContentDimensionZookeeper::from_dimensions(&dimensions);
        let weighted_points =
            build_weighted_points(zookeeper.allowed_dimension_subspace(), &dimensions).unwrap();
        let index = build_variation_index(&weighted_points, &dimensions).unwrap();

        let deepest = DimensionSpacePoint::new([("a", "a2")]);
        assert_eq!(
            index.primary_generalization(deepest.hash()),
            Some(&DimensionSpacePoint::new([("a", "a1")]))
        );
        let weighted = index.weighted_generalizations(deepest.hash()).unwrap();
        assert_eq!(weighted.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert!(index
            .primary_generalization(DimensionSpacePoint::new([("a", "a0")]).hash())
            .is_none());
    }

    #[test]
    fn points_with_unknown_values_are_rejected() {
        let dimensions = vec![chain("a", 1)];
        let subspace = DimensionSpacePointSet::new([DimensionSpacePoint::new([("a", "zz")])]);

        assert!(matches!(
            build_weighted_points(&subspace, &dimensions),
            Err(DimensionSpaceError::DimensionValueNotFound { .. })
        ));
    }

    #[test]
    fn points_with_extra_coordinates_are_rejected() {
        let dimensions = vec![chain("a", 1)];
        let subspace =
            DimensionSpacePointSet::new([DimensionSpacePoint::new([("a", "a0"), ("b", "b0")])]);

        assert!(matches!(
            build_weighted_points(&subspace, &dimensions),
            Err(DimensionSpaceError::DimensionSpacePointNotFound { .. })
        ));
    }
}
