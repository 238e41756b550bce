// Copyright 2025 Cowboy AI, LLC.

//! Errors of the dimension space

use thiserror::Error;

use crate::dimension::DimensionError;

/// Errors raised while building or querying the dimension space
///
/// None of these are recoverable locally: they point at a configuration problem or at a
/// caller passing a point from outside the allowed subspace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DimensionSpaceError {
    /// The point is not part of the allowed dimension subspace
    #[error("Dimension space point {point} was not found in the allowed dimension subspace")]
    DimensionSpacePointNotFound {
        /// JSON rendering of the point
        point: String,
    },

    /// A coordinate references a value its dimension does not declare
    #[error("Value {value} is not declared by content dimension {dimension}")]
    DimensionValueNotFound {
        /// Dimension identifier
        dimension: String,
        /// Unknown value
        value: String,
    },

    /// Two weights over different dimension sets were combined
    #[error("Variation weights {left} and {right} are incomparable")]
    VariationWeightsAreIncomparable {
        /// Left operand
        left: String,
        /// Right operand
        right: String,
    },

    /// Weight arithmetic produced a negative depth
    #[error("Specialization depth {depth} of dimension {dimension} is invalid")]
    SpecializationDepthIsInvalid {
        /// Dimension whose component went negative
        dimension: String,
        /// The resulting (negative) depth
        depth: i64,
    },

    /// A dimension space point could not be parsed
    #[error("Malformed dimension space point: {0}")]
    MalformedDimensionSpacePoint(String),

    /// The dimension configuration is invalid
    #[error(transparent)]
    Configuration(#[from] DimensionError),
}

impl DimensionSpaceError {
    /// Error for a point outside the allowed subspace
    pub fn point_not_found(point: &impl std::fmt::Display) -> Self {
        DimensionSpaceError::DimensionSpacePointNotFound {
            point: point.to_string(),
        }
    }

    /// Check if this error reports an unknown point or value
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DimensionSpaceError::DimensionSpacePointNotFound { .. }
                | DimensionSpaceError::DimensionValueNotFound { .. }
        )
    }
}
