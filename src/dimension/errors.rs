// Copyright 2025 Cowboy AI, LLC.

//! Configuration errors raised while building content dimensions

use thiserror::Error;

/// Errors that can occur while a content dimension is assembled from configuration
///
/// All of these are fatal: a repository must not start with a malformed dimension setup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DimensionError {
    /// The dimension identifier is empty
    #[error("Content dimension identifier must not be empty")]
    EmptyDimensionId,

    /// The dimension declares no values at all
    #[error("Content dimension {dimension} has no values")]
    ContentDimensionValuesAreMissing {
        /// Dimension without values
        dimension: String,
    },

    /// A value string was declared more than once
    #[error("Content dimension {dimension} declares value {value} more than once")]
    DuplicateContentDimensionValue {
        /// Dimension identifier
        dimension: String,
        /// Offending value
        value: String,
    },

    /// A variation edge references a value the dimension does not declare
    #[error("Variation edge in dimension {dimension} references unknown value {value}")]
    UnknownVariationEdgeValue {
        /// Dimension identifier
        dimension: String,
        /// Unknown value
        value: String,
    },

    /// A value has more than one direct generalization
    #[error("Value {value} of dimension {dimension} has more than one generalization")]
    AmbiguousGeneralization {
        /// Dimension identifier
        dimension: String,
        /// Value with several generalizations
        value: String,
    },

    /// Specialization depths do not line up with the variation edges
    #[error(
        "Value {value} of dimension {dimension} has depth {actual}, expected {expected}"
    )]
    SpecializationDepthMismatch {
        /// Dimension identifier
        dimension: String,
        /// Offending value
        value: String,
        /// Depth required by the variation edges
        expected: u32,
        /// Depth that was declared
        actual: u32,
    },

    /// The configuration could not be interpreted
    #[error("Invalid dimension configuration: {0}")]
    InvalidConfiguration(String),
}

impl From<serde_json::Error> for DimensionError {
    fn from(err: serde_json::Error) -> Self {
        DimensionError::InvalidConfiguration(err.to_string())
    }
}
