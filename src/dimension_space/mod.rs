// Copyright 2025 Cowboy AI, LLC.

//! The dimension space
//!
//! Points are combinations of one value per content dimension. The zookeeper decides
//! which combinations are allowed; the variation graph relates every allowed point to
//! every other one.
//!
//! ```mermaid
//! graph LR
//!     Source[ContentDimensionSource] --> Zookeeper[ContentDimensionZookeeper]
//!     Zookeeper --> Subspace[Allowed subspace]
//!     Source --> Graph[InterDimensionalVariationGraph]
//!     Subspace --> Graph
//! ```

mod dimension_space_point;
mod errors;
mod variation_graph;
mod weight;
mod weighted_point;
mod zookeeper;

pub use dimension_space_point::{DimensionSpacePoint, DimensionSpacePointSet};
pub use errors::DimensionSpaceError;
pub use variation_graph::{
    build_variation_index, build_weighted_points, determine_weight_normalization_base,
    InterDimensionalVariationGraph, VariantType, VariationIndex, WeightedDimensionSpacePoints,
};
pub use weight::ContentSubgraphVariationWeight;
pub use weighted_point::WeightedDimensionSpacePoint;
pub use zookeeper::{ContentDimensionZookeeper, DimensionValueCombination};
